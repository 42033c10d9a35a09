//! Bridge to an external DIMACS solver process

use super::constraints::Clause;
use super::protocol::{self, Reply};
use super::result::SolverResult;
use super::variables::Registry;
use crate::config::Settings;
use crate::error::{Result, SolverError};
use log::{debug, info, warn};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Collects clauses and runs them through the configured solver binary
#[derive(Debug)]
pub struct Solver {
    settings: Settings,
    clauses: Vec<Clause>,
}

impl Solver {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            clauses: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Add a single clause to the problem
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Add clauses to the problem, keeping their order
    pub fn add_clauses<I>(&mut self, clauses: I)
    where
        I: IntoIterator<Item = Clause>,
    {
        self.clauses.extend(clauses);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Write the DIMACS problem for the current clauses
    pub fn write_problem<W: Write>(&self, writer: &mut W, registry: &Registry) -> io::Result<()> {
        protocol::write_problem(writer, registry.variable_count(), &self.clauses)
    }

    /// DIMACS text exactly as it is sent to the solver
    pub fn render_problem(&self, registry: &Registry) -> String {
        let mut text = protocol::header(registry.variable_count(), self.clauses.len());
        text.push('\n');
        for clause in &self.clauses {
            text.push_str(&clause.render());
            text.push('\n');
        }
        text
    }

    /// Run the solver on the accumulated clauses.
    ///
    /// Values recorded by an earlier run on `registry` are discarded first.
    /// On `SAT` the assignment is stored in `registry`, where
    /// [`Registry::lookup_result`] picks it up. With `verbose` set the
    /// DIMACS text is echoed to standard output.
    pub fn solve(&mut self, registry: &Registry) -> Result<SolverResult> {
        self.solve_with_echo(registry, &mut io::stdout())
    }

    /// Same as [`Solver::solve`], with the verbose echo going to `echo`
    pub fn solve_with_echo<W: Write>(
        &mut self,
        registry: &Registry,
        echo: &mut W,
    ) -> Result<SolverResult> {
        let start_time = Instant::now();
        registry.clear_results();

        let variable_count = registry.variable_count();
        let problem = self.render_problem(registry);
        if self.settings.verbose {
            echo.write_all(problem.as_bytes())
                .and_then(|()| echo.flush())
                .map_err(|e| SolverError::Output(format!("failed to echo problem: {}", e)))?;
        }
        info!(
            "calculating {} variables and {} clauses",
            variable_count,
            self.clauses.len()
        );

        let mut child = self.spawn()?;
        let stdin = take_pipe(child.stdin.take(), "stdin")?;
        let stdout = take_pipe(child.stdout.take(), "stdout")?;
        let stderr = take_pipe(child.stderr.take(), "stderr")?;
        let deadline = self.settings.timeout().map(|limit| Deadline {
            at: Instant::now() + limit,
            limit,
        });

        // All three pipes are pumped on their own threads while this one
        // waits, so neither side can stall on a full pipe buffer. The pumps
        // are detached: a grandchild holding a pipe open past the deadline
        // must not keep `solve` waiting.
        let writer = pump(move || send_problem(stdin, &problem));
        let reader = pump(move || read_output(stdout));
        let drainer = pump(move || read_diagnostics(stderr));

        let status = wait_for_exit(&mut child, deadline)?;
        debug!("solver exited with {}", status);
        collect(&writer, deadline)?;
        let output = collect(&reader, deadline)?;
        let diagnostics = collect(&drainer, deadline)?;

        let reply = Reply::parse(&output)?;
        let mut result = SolverResult::from_reply(&reply, registry)?;
        for line in diagnostics {
            result.add_statistics_line(line);
        }
        result.set_exit_code(status.code());
        result.set_solve_time(start_time.elapsed());

        info!(
            "solver answered {} in {:.3}s",
            if result.is_satisfiable() { "SAT" } else { "UNSAT" },
            result.solve_time().as_secs_f64()
        );
        Ok(result)
    }

    /// Check the recorded assignment against every clause.
    ///
    /// Fails with [`SolverError::ResultNotAvailable`] if a clause mentions a
    /// variable without a recorded value.
    pub fn verify(&self, registry: &Registry) -> Result<bool> {
        for clause in &self.clauses {
            let mut satisfied = false;
            for variable in clause.variables() {
                if variable.value(registry)? {
                    satisfied = true;
                    break;
                }
            }
            if !satisfied {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn spawn(&self) -> Result<Child> {
        let executable = &self.settings.solver.executable;
        let arguments = &self.settings.solver.arguments;
        debug!("launching {} {}", executable, arguments.join(" "));

        Command::new(executable)
            .args(arguments)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SolverError::ProcessLaunch {
                executable: executable.clone(),
                source,
            })
    }
}

/// Point in time after which the solver counts as hung
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

fn take_pipe<T>(pipe: Option<T>, name: &str) -> io::Result<T> {
    pipe.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::BrokenPipe,
            format!("solver {} was not captured", name),
        )
    })
}

/// Run `task` on a detached thread, handing its outcome back over a channel
fn pump<T, F>(task: F) -> Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone once `solve` has given up on this pipe
        let _ = sender.send(task());
    });
    receiver
}

fn collect<T>(pipe: &Receiver<io::Result<T>>, deadline: Option<Deadline>) -> Result<T> {
    let outcome = match deadline {
        Some(deadline) => pipe.recv_timeout(deadline.remaining()),
        None => pipe.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match outcome {
        Ok(result) => Ok(result?),
        Err(RecvTimeoutError::Timeout) => {
            let limit = deadline.map_or(Duration::ZERO, |d| d.limit);
            warn!("solver pipes still open after {:?}, giving up", limit);
            Err(SolverError::Timeout(limit))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(io::Error::other("solver pipe thread panicked").into())
        }
    }
}

/// Write the problem and close the pipe so the solver sees end of input
fn send_problem(stdin: ChildStdin, problem: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(stdin);
    writer.write_all(problem.as_bytes())?;
    writer.flush()
}

fn read_output(stdout: ChildStdout) -> io::Result<String> {
    let mut output = Vec::new();
    BufReader::new(stdout).read_to_end(&mut output)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Diagnostic lines, decoded leniently
fn read_diagnostics(stderr: ChildStderr) -> io::Result<Vec<String>> {
    BufReader::new(stderr)
        .split(b'\n')
        .map(|line| {
            line.map(|bytes| {
                let text = String::from_utf8_lossy(&bytes);
                text.strip_suffix('\r').unwrap_or(&text).to_string()
            })
        })
        .collect()
}

fn wait_for_exit(child: &mut Child, deadline: Option<Deadline>) -> Result<ExitStatus> {
    let Some(deadline) = deadline else {
        return Ok(child.wait()?);
    };

    match child.wait_timeout(deadline.remaining())? {
        Some(status) => Ok(status),
        None => {
            warn!("solver still running after {:?}, killing it", deadline.limit);
            let _ = child.kill();
            child.wait()?;
            Err(SolverError::Timeout(deadline.limit))
        }
    }
}
