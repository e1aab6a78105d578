//! Textual command parser.
//!
//! # Responsibility
//! - Split one input line into a command word, a preamble and prefixed
//!   arguments (`n/Alex Yeoh p/9123 ...`).
//! - Validate argument values into typed fields.
//!
//! # Invariants
//! - A prefix only starts an argument at the beginning of the argument string
//!   or after whitespace.
//! - Each prefix may appear at most once per command.

use super::{Command, EditStudentDescriptor, Index};
use crate::model::fields::{
    AssignmentName, Email, Name, Phone, Remark, StudentId, TutorialClass, ValidationError,
};
use crate::model::student::Student;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PREFIX_ID: &str = "id/";
pub const PREFIX_NAME: &str = "n/";
pub const PREFIX_PHONE: &str = "p/";
pub const PREFIX_EMAIL: &str = "e/";
pub const PREFIX_TUTORIAL: &str = "t/";
pub const PREFIX_REMARK: &str = "r/";
pub const PREFIX_DATE: &str = "d/";
pub const PREFIX_ASSIGNMENT: &str = "a/";
pub const PREFIX_STATUS: &str = "s/";

static PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)((?:id|n|p|e|t|r|d|a|s)/)").expect("valid prefix regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyInput,
    UnknownCommand(String),
    /// Required argument missing; carries the usage line.
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },
    UnexpectedPrefix {
        command: &'static str,
        prefix: String,
    },
    DuplicatePrefix(String),
    UnexpectedPreamble {
        command: &'static str,
        preamble: String,
    },
    InvalidIndex(String),
    InvalidDate(String),
    InvalidStatus(String),
    NothingToEdit,
    Invalid(ValidationError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no command given; type `help` for usage"),
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`"),
            Self::MissingArgument { command, usage } => {
                write!(f, "invalid `{command}` command; usage: {usage}")
            }
            Self::UnexpectedPrefix { command, prefix } => {
                write!(f, "`{command}` does not accept the `{prefix}` argument")
            }
            Self::DuplicatePrefix(prefix) => write!(f, "argument `{prefix}` given more than once"),
            Self::UnexpectedPreamble { command, preamble } => {
                write!(f, "unexpected text `{preamble}` before `{command}` arguments")
            }
            Self::InvalidIndex(value) => {
                write!(f, "index `{value}` must be a positive whole number")
            }
            Self::InvalidDate(value) => write!(f, "date `{value}` must be YYYY-MM-DD"),
            Self::InvalidStatus(value) => {
                write!(f, "status `{value}` must be `done` or `undone`")
            }
            Self::NothingToEdit => write!(f, "at least one field to edit must be provided"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ParseError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

const ADD_USAGE: &str = "add id/ID n/NAME p/PHONE e/EMAIL [t/TUTORIAL] [r/REMARK]";
const EDIT_USAGE: &str = "edit INDEX [n/NAME] [p/PHONE] [e/EMAIL] [r/REMARK]";
const REMARK_USAGE: &str = "remark INDEX r/REMARK";
const DELETE_USAGE: &str = "delete INDEX";
const FIND_USAGE: &str = "find KEYWORD [MORE_KEYWORDS]...";
const LIST_USAGE: &str = "list [t/TUTORIAL]";
const ADDTUT_USAGE: &str = "addtut TUTORIAL";
const DELTUT_USAGE: &str = "deltut TUTORIAL";
const ASSIGN_USAGE: &str = "assign INDEX t/TUTORIAL";
const MARK_USAGE: &str = "mark INDEX t/TUTORIAL d/YYYY-MM-DD";
const ADDASG_USAGE: &str = "addasg NAME";
const DELASG_USAGE: &str = "delasg NAME";
const CHECKASG_USAGE: &str = "checkasg NAME";
const SETASG_USAGE: &str = "setasg INDEX a/NAME s/done|undone";

/// Parses one input line into a `Command`.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word {
        "add" => parse_add(rest),
        "edit" => parse_edit(rest),
        "remark" => parse_remark(rest),
        "delete" => Ok(Command::Delete(parse_index_only("delete", DELETE_USAGE, rest)?)),
        "find" => {
            let keywords: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            if keywords.is_empty() {
                return Err(missing("find", FIND_USAGE));
            }
            Ok(Command::Find(keywords))
        }
        "list" => parse_list(rest),
        "clear" => no_arguments("clear", rest, Command::Clear),
        "addtut" => Ok(Command::AddTutorial(TutorialClass::parse(required_text(
            "addtut",
            ADDTUT_USAGE,
            rest,
        )?)?)),
        "deltut" => Ok(Command::DeleteTutorial(TutorialClass::parse(required_text(
            "deltut",
            DELTUT_USAGE,
            rest,
        )?)?)),
        "listtut" => no_arguments("listtut", rest, Command::ListTutorials),
        "assign" => parse_assign(rest),
        "mark" => parse_mark(rest),
        "addasg" => Ok(Command::AddAssignment(AssignmentName::parse(required_text(
            "addasg",
            ADDASG_USAGE,
            rest,
        )?)?)),
        "delasg" => Ok(Command::DeleteAssignment(AssignmentName::parse(
            required_text("delasg", DELASG_USAGE, rest)?,
        )?)),
        "checkasg" => Ok(Command::CheckAssignment(AssignmentName::parse(
            required_text("checkasg", CHECKASG_USAGE, rest)?,
        )?)),
        "listasg" => no_arguments("listasg", rest, Command::ListAssignments),
        "setasg" => parse_setasg(rest),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_add(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows(
        "add",
        &[
            PREFIX_ID,
            PREFIX_NAME,
            PREFIX_PHONE,
            PREFIX_EMAIL,
            PREFIX_TUTORIAL,
            PREFIX_REMARK,
        ],
    )?;
    if !map.preamble.is_empty() {
        return Err(missing("add", ADD_USAGE));
    }
    let (Some(id), Some(name), Some(phone), Some(email)) = (
        map.value(PREFIX_ID),
        map.value(PREFIX_NAME),
        map.value(PREFIX_PHONE),
        map.value(PREFIX_EMAIL),
    ) else {
        return Err(missing("add", ADD_USAGE));
    };

    let mut student = Student::new(
        StudentId::parse(id)?,
        Name::parse(name)?,
        Phone::parse(phone)?,
        Email::parse(email)?,
    );
    if let Some(class) = map.value(PREFIX_TUTORIAL) {
        student.tutorial_class = Some(TutorialClass::parse(class)?);
    }
    if let Some(remark) = map.value(PREFIX_REMARK) {
        student.remark = Remark::parse(remark)?;
    }
    Ok(Command::Add(student))
}

fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows(
        "edit",
        &[PREFIX_NAME, PREFIX_PHONE, PREFIX_EMAIL, PREFIX_REMARK],
    )?;
    let index = parse_index("edit", EDIT_USAGE, &map.preamble)?;
    let edit = EditStudentDescriptor {
        name: map.value(PREFIX_NAME).map(Name::parse).transpose()?,
        phone: map.value(PREFIX_PHONE).map(Phone::parse).transpose()?,
        email: map.value(PREFIX_EMAIL).map(Email::parse).transpose()?,
        remark: map.value(PREFIX_REMARK).map(Remark::parse).transpose()?,
    };
    if !edit.is_any_field_edited() {
        return Err(ParseError::NothingToEdit);
    }
    Ok(Command::Edit { index, edit })
}

fn parse_remark(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows("remark", &[PREFIX_REMARK])?;
    let index = parse_index("remark", REMARK_USAGE, &map.preamble)?;
    let remark = map
        .value(PREFIX_REMARK)
        .ok_or_else(|| missing("remark", REMARK_USAGE))?;
    Ok(Command::Remark {
        index,
        remark: Remark::parse(remark)?,
    })
}

fn parse_list(args: &str) -> Result<Command, ParseError> {
    if args.is_empty() {
        return Ok(Command::List);
    }
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows("list", &[PREFIX_TUTORIAL])?;
    if !map.preamble.is_empty() {
        return Err(ParseError::UnexpectedPreamble {
            command: "list",
            preamble: map.preamble,
        });
    }
    match map.value(PREFIX_TUTORIAL) {
        Some(class) if !class.is_empty() => {
            Ok(Command::ListInTutorial(TutorialClass::parse(class)?))
        }
        _ => Err(missing("list", LIST_USAGE)),
    }
}

fn parse_assign(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows("assign", &[PREFIX_TUTORIAL])?;
    let index = parse_index("assign", ASSIGN_USAGE, &map.preamble)?;
    let class = map
        .value(PREFIX_TUTORIAL)
        .ok_or_else(|| missing("assign", ASSIGN_USAGE))?;
    Ok(Command::Assign {
        index,
        tutorial_class: TutorialClass::parse(class)?,
    })
}

fn parse_mark(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows("mark", &[PREFIX_TUTORIAL, PREFIX_DATE])?;
    let index = parse_index("mark", MARK_USAGE, &map.preamble)?;
    let (Some(class), Some(date)) = (map.value(PREFIX_TUTORIAL), map.value(PREFIX_DATE)) else {
        return Err(missing("mark", MARK_USAGE));
    };
    Ok(Command::Mark {
        index,
        tutorial_class: TutorialClass::parse(class)?,
        date: parse_date(date)?,
    })
}

fn parse_setasg(args: &str) -> Result<Command, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows("setasg", &[PREFIX_ASSIGNMENT, PREFIX_STATUS])?;
    let index = parse_index("setasg", SETASG_USAGE, &map.preamble)?;
    let (Some(name), Some(status)) = (map.value(PREFIX_ASSIGNMENT), map.value(PREFIX_STATUS))
    else {
        return Err(missing("setasg", SETASG_USAGE));
    };
    Ok(Command::SetAssignment {
        index,
        name: AssignmentName::parse(name)?,
        completed: parse_status(status)?,
    })
}

fn parse_index_only(
    command: &'static str,
    usage: &'static str,
    args: &str,
) -> Result<Index, ParseError> {
    let map = ArgumentMap::tokenize(args)?;
    map.only_allows(command, &[])?;
    parse_index(command, usage, &map.preamble)
}

fn parse_index(command: &'static str, usage: &'static str, raw: &str) -> Result<Index, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(missing(command, usage));
    }
    raw.parse::<usize>()
        .ok()
        .and_then(Index::from_one_based)
        .ok_or_else(|| ParseError::InvalidIndex(raw.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(raw.trim().to_string()))
}

fn parse_status(raw: &str) -> Result<bool, ParseError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "done" | "y" | "yes" | "true" => Ok(true),
        "undone" | "n" | "no" | "false" => Ok(false),
        _ => Err(ParseError::InvalidStatus(raw.trim().to_string())),
    }
}

fn required_text<'a>(
    command: &'static str,
    usage: &'static str,
    rest: &'a str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        return Err(missing(command, usage));
    }
    Ok(rest)
}

fn no_arguments(command: &'static str, rest: &str, parsed: Command) -> Result<Command, ParseError> {
    if !rest.is_empty() {
        return Err(ParseError::UnexpectedPreamble {
            command,
            preamble: rest.to_string(),
        });
    }
    Ok(parsed)
}

fn missing(command: &'static str, usage: &'static str) -> ParseError {
    ParseError::MissingArgument { command, usage }
}

/// Preamble plus prefix → value map for one argument string.
#[derive(Debug, Default)]
struct ArgumentMap {
    preamble: String,
    values: BTreeMap<String, String>,
}

impl ArgumentMap {
    fn tokenize(args: &str) -> Result<Self, ParseError> {
        let markers: Vec<(usize, usize, &str)> = PREFIX_RE
            .captures_iter(args)
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        let mut map = ArgumentMap {
            preamble: args[..markers.first().map_or(args.len(), |m| m.0)]
                .trim()
                .to_string(),
            values: BTreeMap::new(),
        };
        for (position, (_, value_start, prefix)) in markers.iter().enumerate() {
            let value_end = markers.get(position + 1).map_or(args.len(), |next| next.0);
            let value = args[*value_start..value_end].trim().to_string();
            if map.values.insert((*prefix).to_string(), value).is_some() {
                return Err(ParseError::DuplicatePrefix((*prefix).to_string()));
            }
        }
        Ok(map)
    }

    fn value(&self, prefix: &str) -> Option<&str> {
        self.values.get(prefix).map(String::as_str)
    }

    fn only_allows(&self, command: &'static str, allowed: &[&str]) -> Result<(), ParseError> {
        match self
            .values
            .keys()
            .find(|prefix| !allowed.contains(&prefix.as_str()))
        {
            Some(prefix) => Err(ParseError::UnexpectedPrefix {
                command,
                prefix: prefix.clone(),
            }),
            None => Ok(()),
        }
    }
}
