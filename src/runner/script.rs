//! Completion script generation
//!
//! Prints a shell snippet that defines `alias` and registers a completer calling
//! back into the program with `--complete --position <n> <line>`.

use std::env;
use std::io::{self, Write};

pub const BASH_SCRIPT_FLAG: &str = "--bash-completion-script";
pub const POWERSHELL_SCRIPT_FLAG: &str = "--powershell-completion-script";

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    PowerShell,
}

impl Shell {
    pub fn from_flag(flag: &str) -> Option<Shell> {
        match flag {
            BASH_SCRIPT_FLAG => Some(Shell::Bash),
            POWERSHELL_SCRIPT_FLAG => Some(Shell::PowerShell),
            _ => None,
        }
    }
}

/// Command the script runs: the configured program, else this executable
pub fn program_command(configured: Option<&str>) -> String {
    if let Some(program) = configured {
        return program.to_string();
    }

    env::current_exe()
        .ok()
        .map(|p| p.display().to_string())
        .or_else(|| env::args().next())
        .unwrap_or_else(|| "cmdlex".to_string())
}

pub fn write_script(out: &mut dyn Write, shell: Shell, alias: &str, run: &str) -> io::Result<()> {
    match shell {
        Shell::Bash => {
            writeln!(out, "alias {}=\"{}\"", alias, run)?;
            writeln!(out, "_{}_bash_complete()", alias)?;
            writeln!(out, "{{")?;
            writeln!(out, "  local word=${{COMP_WORDS[COMP_CWORD]}}")?;
            writeln!(out, "  local {}path=${{COMP_WORDS[1]}}", alias)?;
            writeln!(
                out,
                "  local completions=(\"$({} --complete --position ${{COMP_POINT}} \"${{COMP_LINE}}\")\")",
                run
            )?;
            writeln!(out, "  COMPREPLY=( $(compgen -W \"$completions\" -- \"$word\") )")?;
            writeln!(out, "}}")?;
            writeln!(out, "complete -f -F _{}_bash_complete {}", alias, alias)?;
        }
        Shell::PowerShell => {
            writeln!(out, "function {} {{ {} $args }}", alias, run)?;
            writeln!(
                out,
                "Register-ArgumentCompleter -Native -CommandName {} -ScriptBlock {{",
                alias
            )?;
            writeln!(out, "  param($commandName, $wordToComplete, $cursorPosition)")?;
            writeln!(
                out,
                "  {} --complete --position $cursorPosition \"$wordToComplete\" | ForEach-Object {{",
                run
            )?;
            writeln!(
                out,
                "    [System.Management.Automation.CompletionResult]::new($_, $_, 'ParameterValue', $_)"
            )?;
            writeln!(out, "  }}")?;
            writeln!(out, "}}")?;
        }
    }

    Ok(())
}
