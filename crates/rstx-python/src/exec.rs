//! Fragment execution in a child interpreter.
//!
//! Standard output of the child is captured through a pipe for the lifetime
//! of the child only. The parent's own stdout is never redirected.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{self, Path, PathBuf};
use std::process::{Command, Stdio};

use rstx_directive::ExecError;

/// Environment variable holding the figure output path.
pub(crate) const FIGURE_PATH_VAR: &str = "RSTX_FIGURE_PATH";

/// Wrap a plotting fragment so it draws on a fresh figure and saves it.
///
/// `plt` is predefined for the fragment.
pub(crate) fn figure_script(source: &str) -> String {
    format!(
        "import matplotlib\n\
         matplotlib.use(\"Agg\")\n\
         import matplotlib.pyplot as plt\n\
         plt.close(\"all\")\n\
         plt.figure(figsize=(8, 6))\n\
         {source}\n\
         import os as _rstx_os\n\
         import matplotlib.pyplot as _rstx_plt\n\
         _rstx_plt.savefig(_rstx_os.environ[\"{FIGURE_PATH_VAR}\"])\n"
    )
}

/// One interpreter invocation: `<interpreter> -c <script>`.
pub(crate) struct Run<'a> {
    pub interpreter: &'a str,
    pub script: &'a str,
    pub cwd: &'a Path,
    pub roots: &'a [PathBuf],
    pub figure_path: Option<&'a Path>,
}

impl Run<'_> {
    /// Run to completion and return captured stdout.
    pub(crate) fn output(&self) -> Result<String, ExecError> {
        let spawn_error = |source: io::Error| ExecError::Spawn {
            program: self.interpreter.to_owned(),
            source,
        };

        // The child runs in `cwd`, so paths it receives must not be relative
        // to ours.
        let cwd = path::absolute(self.cwd).map_err(spawn_error)?;
        let roots = self
            .roots
            .iter()
            .map(path::absolute)
            .collect::<io::Result<Vec<_>>>()
            .map_err(spawn_error)?;

        let mut command = Command::new(self.interpreter);
        command
            .arg("-c")
            .arg(self.script)
            .current_dir(&cwd)
            .env("PYTHONPATH", python_path(&roots).map_err(spawn_error)?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(figure_path) = self.figure_path {
            command.env(FIGURE_PATH_VAR, path::absolute(figure_path).map_err(spawn_error)?);
        }

        tracing::debug!(interpreter = self.interpreter, cwd = %cwd.display(), "executing fragment");
        let output = command.output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !output.stderr.is_empty() {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "embedded code wrote to stderr"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Import roots followed by any inherited `PYTHONPATH` entries.
fn python_path(roots: &[PathBuf]) -> io::Result<OsString> {
    let inherited = env::var_os("PYTHONPATH");
    let inherited = inherited.iter().flat_map(env::split_paths);
    env::join_paths(roots.iter().cloned().chain(inherited)).map_err(io::Error::other)
}
