//! Line-oriented editing shell
//!
//! Each input line is one user event, parsed with clap and applied to the
//! [`EditorService`] before the next line is read. Positions are 0-based and
//! match the `outline` display.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::services::EditorService;
use crate::application::{ApplicationError, ApplicationResult, OutlineExt};
use crate::domain::{Direction, Edit, Material, Operation, Scene, SceneKind};
use crate::infrastructure::{InfraError, InfraResult};

/// One shell input line.
#[derive(Parser, Debug)]
#[command(
    name = "materialtree",
    no_binary_name = true,
    disable_version_flag = true,
    after_help = "Words are split on whitespace. Quote to keep spaces: title topic 0 \"Intro  to Rust\", export 'my course.json'"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Append a new node
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Remove a node
    #[command(alias = "remove")]
    Rm {
        #[command(subcommand)]
        target: NodeTarget,
    },

    /// Swap a node with its predecessor
    Up {
        #[command(subcommand)]
        target: NodeTarget,
    },

    /// Swap a node with its successor
    Down {
        #[command(subcommand)]
        target: NodeTarget,
    },

    /// Set a title (no text clears it)
    Title {
        #[command(subcommand)]
        target: TitleTarget,
    },

    /// Switch a scene between bubble and points
    Kind {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        kind: SceneKind,
    },

    /// Set a scene's bubble text
    Text {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Set one point of a scene
    Point {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        point: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Set a scene's stable part identifier
    Part {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        part: String,
    },

    /// Replace the whole material with a file's content
    Import { file: PathBuf },

    /// Write the material to a file
    Export {
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the serialized material
    Preview,

    /// Print the material as a tree
    Outline,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum AddTarget {
    Topic,
    Subtopic {
        topic: usize,
    },
    Scene {
        topic: usize,
        sub_topic: usize,
    },
    Point {
        topic: usize,
        sub_topic: usize,
        scene: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeTarget {
    Topic {
        topic: usize,
    },
    Subtopic {
        topic: usize,
        sub_topic: usize,
    },
    Scene {
        topic: usize,
        sub_topic: usize,
        scene: usize,
    },
    Point {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        point: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum TitleTarget {
    Topic {
        topic: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    Subtopic {
        topic: usize,
        sub_topic: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    Scene {
        topic: usize,
        sub_topic: usize,
        scene: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Structural edit shared by `rm`, `up` and `down`.
#[derive(Debug, Clone, Copy)]
enum Structural {
    Remove,
    Move(Direction),
}

impl Structural {
    fn edit<T>(self, index: usize) -> Edit<T> {
        match self {
            Structural::Remove => Edit::Remove(index),
            Structural::Move(direction) => Edit::Move(index, direction),
        }
    }
}

fn structural_op(
    material: &Material,
    target: &NodeTarget,
    kind: Structural,
) -> ApplicationResult<Operation> {
    let op = match *target {
        NodeTarget::Topic { topic } => Operation::Topics(kind.edit(topic)),
        NodeTarget::Subtopic { topic, sub_topic } => Operation::SubTopics {
            topic: material.require_topic(topic)?.id,
            edit: kind.edit(sub_topic),
        },
        NodeTarget::Scene {
            topic,
            sub_topic,
            scene,
        } => Operation::Scenes {
            sub_topic: material.require_sub_topic(topic, sub_topic)?.id,
            edit: kind.edit(scene),
        },
        NodeTarget::Point {
            topic,
            sub_topic,
            scene,
            point,
        } => Operation::Points {
            scene: material.require_scene(topic, sub_topic, scene)?.id,
            edit: kind.edit(point),
        },
    };
    Ok(op)
}

fn add_op(material: &Material, target: &AddTarget) -> ApplicationResult<Operation> {
    let op = match *target {
        AddTarget::Topic => Operation::Topics(Edit::Add),
        AddTarget::Subtopic { topic } => Operation::SubTopics {
            topic: material.require_topic(topic)?.id,
            edit: Edit::Add,
        },
        AddTarget::Scene { topic, sub_topic } => Operation::Scenes {
            sub_topic: material.require_sub_topic(topic, sub_topic)?.id,
            edit: Edit::Add,
        },
        AddTarget::Point {
            topic,
            sub_topic,
            scene,
        } => Operation::Points {
            scene: material.require_scene(topic, sub_topic, scene)?.id,
            edit: Edit::Add,
        },
    };
    Ok(op)
}

fn title_op(material: &Material, target: &TitleTarget) -> ApplicationResult<Operation> {
    let op = match target {
        TitleTarget::Topic { topic, text } => Operation::Topics(Edit::Replace(
            *topic,
            material.require_topic(*topic)?.with_title(text.join(" ")),
        )),
        TitleTarget::Subtopic {
            topic,
            sub_topic,
            text,
        } => Operation::SubTopics {
            topic: material.require_topic(*topic)?.id,
            edit: Edit::Replace(
                *sub_topic,
                material
                    .require_sub_topic(*topic, *sub_topic)?
                    .with_title(text.join(" ")),
            ),
        },
        TitleTarget::Scene {
            topic,
            sub_topic,
            scene,
            text,
        } => scene_replace(material, *topic, *sub_topic, *scene, |s| {
            s.with_title(text.join(" "))
        })?,
    };
    Ok(op)
}

/// Replace the scene at a position with `f(scene)`.
fn scene_replace(
    material: &Material,
    topic: usize,
    sub_topic: usize,
    scene: usize,
    f: impl FnOnce(&Scene) -> Scene,
) -> ApplicationResult<Operation> {
    let current = material.require_scene(topic, sub_topic, scene)?;
    Ok(Operation::Scenes {
        sub_topic: material.require_sub_topic(topic, sub_topic)?.id,
        edit: Edit::Replace(scene, f(current)),
    })
}

/// Split a shell line into words.
///
/// `"..."` and `'...'` group words and keep inner whitespace; inside double
/// quotes and outside quotes a backslash escapes the next character.
pub fn split_words(line: &str) -> Result<Vec<String>, &'static str> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err("unterminated quote"),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => word.push(chars.next().ok_or("unterminated quote")?),
                        Some(c) => word.push(c),
                        None => return Err("unterminated quote"),
                    }
                }
            }
            '\\' => {
                in_word = true;
                word.push(chars.next().ok_or("dangling escape at end of line")?);
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

/// Interactive session over one editor service.
pub struct Shell<'a> {
    editor: &'a mut EditorService,
    prompt: Option<String>,
}

impl<'a> Shell<'a> {
    /// `prompt` is printed before each line when set (interactive terminals).
    pub fn new(editor: &'a mut EditorService, prompt: Option<String>) -> Self {
        Self { editor, prompt }
    }

    /// Read commands until end of input or `quit`.
    ///
    /// Failing commands are reported on `out` and the session continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> InfraResult<()> {
        let mut lines = input.lines();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(out, "{}", prompt.cyan()).map_err(|e| InfraError::io("write prompt", e))?;
                out.flush().map_err(|e| InfraError::io("flush output", e))?;
            }
            let line = match lines.next() {
                Some(line) => line.map_err(|e| InfraError::io("read shell input", e))?,
                None => break,
            };
            if self.handle_line(&line, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and execute one line.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> InfraResult<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let write_err = |e| InfraError::io("write shell output", e);

        let words = match split_words(line) {
            Ok(words) => words,
            Err(msg) => {
                writeln!(out, "{}: {}", "error".red().bold(), msg).map_err(write_err)?;
                return Ok(Flow::Continue);
            }
        };
        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // help and usage errors both render through clap
                write!(out, "{}", e).map_err(write_err)?;
                return Ok(Flow::Continue);
            }
        };

        match self.execute(parsed.command, out) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                writeln!(out, "{}: {}", "error".red().bold(), e).map_err(write_err)?;
                Ok(Flow::Continue)
            }
        }
    }

    #[instrument(level = "debug", skip(self, out))]
    fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> ApplicationResult<Flow> {
        let material = self.editor.material();
        let op = match &command {
            ShellCommand::Add { target } => add_op(material, target)?,
            ShellCommand::Rm { target } => structural_op(material, target, Structural::Remove)?,
            ShellCommand::Up { target } => {
                structural_op(material, target, Structural::Move(Direction::Up))?
            }
            ShellCommand::Down { target } => {
                structural_op(material, target, Structural::Move(Direction::Down))?
            }
            ShellCommand::Title { target } => title_op(material, target)?,
            ShellCommand::Kind {
                topic,
                sub_topic,
                scene,
                kind,
            } => scene_replace(material, *topic, *sub_topic, *scene, |s| s.with_kind(*kind))?,
            ShellCommand::Text {
                topic,
                sub_topic,
                scene,
                text,
            } => scene_replace(material, *topic, *sub_topic, *scene, |s| {
                s.with_bubble_text(text.join(" "))
            })?,
            ShellCommand::Point {
                topic,
                sub_topic,
                scene,
                point,
                text,
            } => Operation::Points {
                scene: material.require_scene(*topic, *sub_topic, *scene)?.id,
                edit: Edit::Replace(*point, text.join(" ")),
            },
            ShellCommand::Part {
                topic,
                sub_topic,
                scene,
                part,
            } => scene_replace(material, *topic, *sub_topic, *scene, |s| {
                s.with_part(part.clone())
            })?,
            ShellCommand::Import { file } => {
                self.editor.import_file(file)?;
                let (topics, sub_topics, scenes) = self.editor.material().counts();
                self.say(
                    out,
                    format!(
                        "imported {} ({} topics, {} subtopics, {} scenes)",
                        file.display(),
                        topics,
                        sub_topics,
                        scenes
                    ),
                )?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Export { file, force } => {
                self.editor.export_file(file, *force)?;
                self.say(out, format!("exported {}", file.display()))?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Preview => {
                let text = self.editor.preview()?;
                self.say(out, text)?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Outline => {
                let text = self.editor.material().to_outline().to_string();
                self.say(out, text.trim_end())?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        };

        debug!("execute: {:?}", op);
        if !self.editor.apply(&op) {
            self.say(out, format!("{}: nothing changed", "Warning".yellow()))?;
        }
        Ok(Flow::Continue)
    }

    fn say<W: Write>(&self, out: &mut W, msg: impl std::fmt::Display) -> ApplicationResult<()> {
        writeln!(out, "{}", msg).map_err(|e| ApplicationError::OperationFailed {
            context: "write shell output".to_string(),
            source: Box::new(e),
        })
    }
}
