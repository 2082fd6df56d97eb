//! Line-oriented command scripts driving an [`EditorSession`]
//!
//! ```text
//! # comment
//! add - "Part One" as p1
//! add p1 Chapter 1 as c1
//! rename c1 "Getting started"
//! move c1 before p1
//! expand p1
//! show
//! ```

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::application::session::EditorSession;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, Position};

/// Token standing for "no parent" in `add`.
pub const ROOT_TOKEN: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Add {
        parent: Option<String>,
        title: String,
        alias: Option<String>,
    },
    Rename {
        id: String,
        title: String,
    },
    Delete {
        id: String,
    },
    Move {
        dragged: String,
        position: Position,
        target: String,
    },
    Expand {
        id: String,
    },
    Collapse {
        id: String,
    },
    Toggle {
        id: String,
    },
    ExpandAll,
    CollapseAll,
    Show,
    Export,
}

/// Receives `show` and `export` requests while a script runs.
pub trait ScriptSink {
    fn show(&mut self, session: &EditorSession) -> ApplicationResult<()>;
    fn export(&mut self, session: &EditorSession) -> ApplicationResult<()>;
}

/// Outcome counts of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Commands that changed the forest
    pub applied: usize,
    /// Mutations that were a no-op (unknown id, blank rename)
    pub unchanged: usize,
    /// Rejected moves
    pub rejected: usize,
}

impl ScriptReport {
    fn tally(&mut self, changed: bool) {
        if changed {
            self.applied += 1;
        } else {
            self.unchanged += 1;
        }
    }
}

/// Splits a line into whitespace-separated tokens; double quotes group words.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parses one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, line_no: usize) -> ApplicationResult<Option<ScriptCommand>> {
    let err = |message: String| ApplicationError::Script {
        line: line_no,
        message,
    };

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize(trimmed).map_err(err)?;
    let (verb, args) = match tokens.split_first() {
        Some((verb, args)) => (verb.to_ascii_lowercase(), args),
        None => return Ok(None),
    };

    let single_id = |name: &str| -> ApplicationResult<String> {
        match args {
            [id] => Ok(id.clone()),
            _ => Err(err(format!("usage: {name} <id>"))),
        }
    };
    let no_args = |cmd: ScriptCommand, name: &str| -> ApplicationResult<ScriptCommand> {
        if args.is_empty() {
            Ok(cmd)
        } else {
            Err(err(format!("{name} takes no arguments")))
        }
    };

    let command = match verb.as_str() {
        "add" => {
            let Some((parent, rest)) = args.split_first() else {
                return Err(err("usage: add <parent|-> <title...> [as <alias>]".to_string()));
            };
            let (title_tokens, alias) = match rest {
                [title @ .., kw, alias] if kw.as_str() == "as" => (title, Some(alias.clone())),
                _ => (rest, None),
            };
            ScriptCommand::Add {
                parent: (parent != ROOT_TOKEN).then(|| parent.clone()),
                title: title_tokens.join(" "),
                alias,
            }
        }
        "rename" => {
            let Some((id, rest)) = args.split_first() else {
                return Err(err("usage: rename <id> <title...>".to_string()));
            };
            ScriptCommand::Rename {
                id: id.clone(),
                title: rest.join(" "),
            }
        }
        "delete" => ScriptCommand::Delete {
            id: single_id("delete")?,
        },
        "move" => match args {
            [dragged, position, target] => ScriptCommand::Move {
                dragged: dragged.clone(),
                position: position.parse().map_err(err)?,
                target: target.clone(),
            },
            _ => return Err(err("usage: move <dragged> before|after <target>".to_string())),
        },
        "expand" => ScriptCommand::Expand {
            id: single_id("expand")?,
        },
        "collapse" => ScriptCommand::Collapse {
            id: single_id("collapse")?,
        },
        "toggle" => ScriptCommand::Toggle {
            id: single_id("toggle")?,
        },
        "expand-all" => no_args(ScriptCommand::ExpandAll, "expand-all")?,
        "collapse-all" => no_args(ScriptCommand::CollapseAll, "collapse-all")?,
        "show" => no_args(ScriptCommand::Show, "show")?,
        "export" => no_args(ScriptCommand::Export, "export")?,
        other => return Err(err(format!("unknown command: {other}"))),
    };
    Ok(Some(command))
}

/// Executes scripts, keeping `add … as <alias>` bindings across lines.
#[derive(Debug, Default)]
pub struct ScriptRunner {
    aliases: HashMap<String, NodeId>,
}

impl ScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id bound to `alias`, if any.
    pub fn alias(&self, alias: &str) -> Option<&NodeId> {
        self.aliases.get(alias)
    }

    fn resolve(&self, token: &str) -> NodeId {
        self.aliases
            .get(token)
            .cloned()
            .unwrap_or_else(|| NodeId::from(token))
    }

    /// Runs every line of `text` against `session`.
    ///
    /// Parse errors abort the run; rejected moves are counted and skipped.
    #[instrument(level = "debug", skip_all)]
    pub fn run(
        &mut self,
        session: &mut EditorSession,
        text: &str,
        sink: &mut dyn ScriptSink,
    ) -> ApplicationResult<ScriptReport> {
        let mut report = ScriptReport::default();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let Some(command) = parse_line(line, line_no)? else {
                continue;
            };
            debug!("line {}: {:?}", line_no, command);
            self.execute(session, command, line_no, sink, &mut report)?;
        }
        Ok(report)
    }

    fn execute(
        &mut self,
        session: &mut EditorSession,
        command: ScriptCommand,
        line_no: usize,
        sink: &mut dyn ScriptSink,
        report: &mut ScriptReport,
    ) -> ApplicationResult<()> {
        match command {
            ScriptCommand::Add {
                parent,
                title,
                alias,
            } => {
                let parent = parent.map(|p| self.resolve(&p));
                let id = session
                    .add(parent.as_ref(), &title)
                    .map_err(|e| ApplicationError::Script {
                        line: line_no,
                        message: e.to_string(),
                    })?;
                if let Some(alias) = alias {
                    self.aliases.insert(alias, id);
                }
                report.applied += 1;
            }
            ScriptCommand::Rename { id, title } => {
                let id = self.resolve(&id);
                report.tally(session.rename(&id, &title));
            }
            ScriptCommand::Delete { id } => {
                let id = self.resolve(&id);
                report.tally(session.delete(&id));
            }
            ScriptCommand::Move {
                dragged,
                position,
                target,
            } => {
                let dragged = self.resolve(&dragged);
                let target = self.resolve(&target);
                match session.move_node(&dragged, &target, position) {
                    Ok(()) => report.applied += 1,
                    Err(rejection) => {
                        warn!("line {}: {}", line_no, rejection);
                        report.rejected += 1;
                    }
                }
            }
            ScriptCommand::Expand { id } => session.expand(&self.resolve(&id)),
            ScriptCommand::Collapse { id } => session.collapse(&self.resolve(&id)),
            ScriptCommand::Toggle { id } => {
                session.toggle(&self.resolve(&id));
            }
            ScriptCommand::ExpandAll => session.expand_all(),
            ScriptCommand::CollapseAll => session.collapse_all(),
            ScriptCommand::Show => sink.show(session)?,
            ScriptCommand::Export => sink.export(session)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"add - "Part One" as p1"#).unwrap(),
            vec!["add", "-", "Part One", "as", "p1"]
        );
        assert_eq!(tokenize(r#"rename x """#).unwrap(), vec!["rename", "x", ""]);
        assert!(tokenize(r#"add - "open"#).is_err());
    }
}
