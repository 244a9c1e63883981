//! Ejecución de binarios externos.
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::errors::CollaboratorError;

pub(crate) struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Lanza `program args..` (opcionalmente en `cwd`, con `env` y `stdin`) y
/// captura su salida. Un exit code distinto de cero no es error aquí; el
/// llamador decide con `success`.
pub(crate) fn run(program: &str,
                  args: &[&str],
                  cwd: Option<&Path>,
                  env: &[(String, String)],
                  stdin: Option<&str>)
                  -> Result<CommandOutput, CollaboratorError> {
    debug!("Running command {program} {}", args.join(" "));
    let mut cmd = Command::new(program);
    cmd.args(args)
       .stdout(Stdio::piped())
       .stderr(Stdio::piped())
       .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() });
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (k, v) in env {
        cmd.env(k, v);
    }

    let mut child = cmd.spawn()?;
    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input.as_bytes())?;
    }
    let out = child.wait_with_output()?;
    Ok(CommandOutput { success: out.status.success(),
                       stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                       stderr: String::from_utf8_lossy(&out.stderr).trim().to_string() })
}

/// Igual que `run` pero un exit code distinto de cero es `CommandFailed`.
pub(crate) fn run_checked(program: &str,
                          args: &[&str],
                          cwd: Option<&Path>,
                          env: &[(String, String)],
                          stdin: Option<&str>)
                          -> Result<String, CollaboratorError> {
    let out = run(program, args, cwd, env, stdin)?;
    if out.success {
        Ok(out.stdout)
    } else {
        Err(CollaboratorError::CommandFailed { command: format!("{program} {}", args.join(" ")),
                                               stderr: out.stderr })
    }
}
