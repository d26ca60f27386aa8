//! Help rendering

use crate::catalog::{CommandGroup, Operation, ParamType, ParameterSpec};
use crate::config::Settings;
use crate::resolve::Suggestion;
use crate::runner::docs::{self, Docs, MemberDoc};
use std::io::{self, Write};

/// Write one help entry per suggestion.
///
/// Group entries show the group description; operation entries also list every
/// parameter. Each entry is followed by a blank line.
pub fn write_help(out: &mut dyn Write, suggestions: &[Suggestion], settings: &Settings) -> io::Result<()> {
    for suggestion in suggestions {
        let docs = docs::for_group(&suggestion.group, settings.documentation.as_deref());

        match &suggestion.operation {
            None => {
                let description = describe_group(&suggestion.group, docs.as_deref());
                write_line(out, format!("{:<23}{}", suggestion.text, description.unwrap_or_default()))?;
            }
            Some(op) => {
                let op_doc = docs
                    .as_deref()
                    .and_then(|d| d.operation(&suggestion.group.identity, &op.name));

                let description = describe_operation(op, op_doc);
                write_line(out, format!("{:<23}{}", suggestion.text, description.unwrap_or_default()))?;

                for param in &op.parameters {
                    write_line(out, format!("  -{:<20}{}", param.name, describe_parameter(param, op_doc)))?;
                }
            }
        }

        writeln!(out)?;
    }

    Ok(())
}

fn write_line(out: &mut dyn Write, line: String) -> io::Result<()> {
    writeln!(out, "{}", line.trim_end())
}

/// Explicit description, else the first line of the documented summary
pub fn describe_group(group: &CommandGroup, docs: Option<&Docs>) -> Option<String> {
    group.description.clone().or_else(|| {
        docs.and_then(|d| d.group(&group.identity))
            .and_then(MemberDoc::summary_line)
    })
}

pub fn describe_operation(op: &Operation, doc: Option<&MemberDoc>) -> Option<String> {
    op.description
        .clone()
        .or_else(|| doc.and_then(MemberDoc::summary_line))
}

/// Best available description of a parameter, falling back to its type
pub fn describe_parameter(param: &ParameterSpec, doc: Option<&MemberDoc>) -> String {
    if let Some(description) = &param.description {
        return description.clone();
    }

    if let Some(text) = doc.and_then(|d| d.param(&param.name)) {
        return text.to_string();
    }

    match param.ty.underlying() {
        ParamType::Enum(ty) => ty.names().collect::<Vec<_>>().join(" | "),
        ParamType::Scalar(kind) => kind.type_code().to_string(),
        other => other.display_name(),
    }
}
