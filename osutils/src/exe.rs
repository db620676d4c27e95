use std::{
    os::unix::process::ExitStatusExt,
    process::{Command, Output},
};

use anyhow::{anyhow, bail, Context, Error};
use log::trace;

use crate::crate_private::Sealed;

/// Extension for `std::process::Output` to check the exit status and get
/// the output, producing anyhow errors.
/// This is a sealed trait, so it cannot be implemented outside of this crate.
pub trait OutputChecker: Sealed {
    /// Check if the process exited successfully
    fn is_success(&self) -> bool;

    /// Get the exit code of the process, if it exited normally
    fn exit_code(&self) -> Option<i32>;

    /// Get the signal that terminated the process, if it was terminated by a signal
    fn end_signal(&self) -> Option<i32>;

    /// Get stdout
    fn output(&self) -> String;

    /// Get stderr
    fn error_output(&self) -> String;

    /// Get all available output, useful for reporting or debugging
    fn output_report(&self) -> String {
        let stdout = self.output();
        let stderr = self.error_output();

        let mut res = String::with_capacity(stdout.len() + stderr.len() + 20);

        if !stdout.is_empty() {
            res += &format!("stdout:\n{}\n", stdout);
        }

        if !stderr.is_empty() {
            if !res.is_empty() {
                res += "\n";
            }
            res += &format!("stderr:\n{}\n", stderr);
        }

        res
    }

    /// Produce a string explaining the exit status of the process
    fn explain_exit(&self) -> String {
        if let Some(code) = self.exit_code() {
            format!("process exited with status: {code}")
        } else if let Some(signal) = self.end_signal() {
            format!("process was terminated by signal: {signal}")
        } else {
            "process exited with unknown status".into()
        }
    }

    /// Check if the process exited successfully and return stdout, otherwise
    /// produce an error carrying everything the process printed
    fn check_output(&self) -> Result<String, Error>;
}

impl Sealed for Output {}

impl OutputChecker for Output {
    fn is_success(&self) -> bool {
        self.status.success()
    }

    fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    fn end_signal(&self) -> Option<i32> {
        self.status.signal()
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into()
    }

    fn error_output(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into()
    }

    fn check_output(&self) -> Result<String, Error> {
        if self.is_success() {
            return Ok(self.output());
        }

        Err(match self.output_report() {
            s if !s.is_empty() => anyhow!("Process output:\n{}", s).context(self.explain_exit()),
            _ => anyhow!("(No output was captured)").context(self.explain_exit()),
        })
    }
}

impl Sealed for Result<Output, std::io::Error> {}

impl OutputChecker for Result<Output, std::io::Error> {
    fn is_success(&self) -> bool {
        self.as_ref()
            .map(|output| output.is_success())
            .unwrap_or(false)
    }

    fn exit_code(&self) -> Option<i32> {
        self.as_ref().ok().and_then(|output| output.exit_code())
    }

    fn end_signal(&self) -> Option<i32> {
        self.as_ref().ok().and_then(|output| output.end_signal())
    }

    fn output(&self) -> String {
        self.as_ref()
            .map(|output| output.output())
            .unwrap_or_default()
    }

    fn error_output(&self) -> String {
        self.as_ref()
            .map(|output| output.error_output())
            .unwrap_or_default()
    }

    fn explain_exit(&self) -> String {
        match self {
            Ok(output) => output.explain_exit(),
            Err(e) => format!("Failed to execute process: {e}"),
        }
    }

    fn check_output(&self) -> Result<String, Error> {
        match self {
            Ok(output) => output.check_output(),
            Err(e) => bail!("Failed to execute process: {}", e),
        }
    }
}

pub trait RunAndCheck: Sealed {
    /// Run the command, check that it succeeded and return its stdout
    fn output_and_check(&mut self) -> Result<String, Error>;

    /// Render the command line the way a shell user would type it
    fn render_command(&self) -> String;
}

impl Sealed for Command {}

impl RunAndCheck for Command {
    fn output_and_check(&mut self) -> Result<String, Error> {
        let rendered_command = self.render_command();
        trace!("Executing '{rendered_command}'");
        let result = self.output();
        trace!(
            "Executed '{rendered_command}': {}. Report:\n{}",
            result.explain_exit(),
            result.output_report(),
        );
        result
            .check_output()
            .with_context(|| format!("Error when running: {rendered_command}"))
    }

    fn render_command(&self) -> String {
        let program = self.get_program().to_string_lossy();
        let args = self
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .map(|arg| {
                if arg.contains(' ') {
                    format!("'{}'", arg)
                } else {
                    arg.into()
                }
            })
            .collect::<Vec<_>>();

        if args.is_empty() {
            program.into()
        } else {
            format!("{} {}", program, args.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_checker() {
        let output = Command::new("echo").arg("controller").output().unwrap();

        assert!(output.is_success());
        assert_eq!(output.exit_code(), Some(0));
        assert_eq!(output.end_signal(), None);
        assert_eq!(output.error_output(), "");
        assert_eq!(output.explain_exit(), "process exited with status: 0");
        assert_eq!(output.check_output().unwrap(), "controller\n");

        let output = Command::new("false").output().unwrap();
        assert!(!output.is_success());
        assert_eq!(output.exit_code(), Some(1));
        assert_eq!(output.explain_exit(), "process exited with status: 1");
        let error = output.check_output().unwrap_err();
        assert_eq!(error.to_string(), "process exited with status: 1");
        assert_eq!(error.root_cause().to_string(), "(No output was captured)");

        let result = Command::new("/doesnotexist_1234").output();
        assert!(!result.is_success(), "Expected failure, got {:?}", result);
        assert_eq!(result.exit_code(), None);
        assert_eq!(result.output(), "");
        assert!(result.check_output().is_err());
        assert!(result.explain_exit().contains("Failed to execute process:"));
    }

    #[test]
    fn test_output_report() {
        let output = Command::new("bash")
            .arg("-c")
            .arg("echo out; echo err >&2; exit 4")
            .output()
            .unwrap();

        assert_eq!(output.exit_code(), Some(4));
        assert_eq!(output.output_report(), "stdout:\nout\n\n\nstderr:\nerr\n\n");

        let error = output.check_output().unwrap_err();
        assert_eq!(error.to_string(), "process exited with status: 4");
        assert!(error.root_cause().to_string().contains("stderr:\nerr"));
    }

    #[test]
    fn test_output_and_check() {
        let mut cmd = Command::new("echo");
        cmd.arg("-fmt").arg("xml");
        assert_eq!(cmd.output_and_check().unwrap(), "-fmt xml\n");

        let mut cmd = Command::new("nonexistent_command_1234");
        cmd.arg("storage");
        let error = cmd.output_and_check().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error when running: nonexistent_command_1234 storage"
        );

        let mut cmd = Command::new("cat");
        cmd.arg("/nonexistent_file_1234");
        cmd.output_and_check().unwrap_err();
    }

    #[test]
    fn test_render_command() {
        let cmd = Command::new("omreport");
        assert_eq!(cmd.render_command(), "omreport");

        let mut cmd = Command::new("omreport");
        cmd.args(["storage", "pdisk", "controller=0", "-fmt", "xml"]);
        assert_eq!(
            cmd.render_command(),
            "omreport storage pdisk controller=0 -fmt xml"
        );

        let mut cmd = Command::new("echo");
        cmd.arg("something with spaces");
        assert_eq!(cmd.render_command(), "echo 'something with spaces'");
    }
}
