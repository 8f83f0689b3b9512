use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prun::errors::CommandFailure;
use prun::exec::CommandRunner;
use prun::types::{CommandOutcome, CommandSpec, WorkerId};

/// What the fake should do for a given program name.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    Succeed,
    Fail,
    Panic,
}

/// A fake runner that:
/// - records which worker ran which command
/// - tracks how many commands are in flight at once
/// - sleeps for `delay`, then resolves per the program's `Script`
///   (default: succeed).
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    delay: Duration,
    scripts: HashMap<String, Script>,
    pub executed: Arc<Mutex<Vec<(WorkerId, CommandSpec)>>>,
    in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl FakeRunner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn script(mut self, program: &str, script: Script) -> Self {
        self.scripts.insert(program.to_string(), script);
        self
    }

    pub fn executed(&self) -> Vec<(WorkerId, CommandSpec)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        worker: WorkerId,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.executed
                .lock()
                .unwrap()
                .push((worker, command.clone()));

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.scripts.get(&command.program).copied().unwrap_or(Script::Succeed) {
                Script::Succeed => CommandOutcome::success(),
                Script::Fail => {
                    CommandOutcome::failed(CommandFailure::NonZeroExit { code: Some(1) })
                }
                Script::Panic => panic!("scripted panic for {}", command.program),
            }
        })
    }
}
