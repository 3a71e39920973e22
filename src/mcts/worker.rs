//! Background thinking thread.
//!
//! A front end submits a snapshot of the match and keeps running; the
//! chosen move arrives on the returned channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::core::Action;
use crate::rules::MindbugGame;

use super::config::MCTSConfig;
use super::search::MCTSAgent;

struct Job {
    game: MindbugGame,
    reply: Sender<Option<Action>>,
}

/// An owning handle to a thread running one `MCTSAgent`.
///
/// Dropping the handle closes the job queue and joins the thread once the
/// search in progress has finished.
pub struct AgentWorker {
    jobs: Option<Sender<Job>>,
    join_handle: Option<JoinHandle<()>>,
}

impl AgentWorker {
    pub fn spawn(config: MCTSConfig) -> std::io::Result<AgentWorker> {
        let (jobs, queue) = mpsc::channel::<Job>();
        let join_handle = std::thread::Builder::new()
            .name("mindbug-agent".to_owned())
            .spawn(move || {
                let mut agent = MCTSAgent::new(config);
                tracing::debug!(target: "mindbug", "agent worker started");
                for job in queue {
                    let action = agent.choose_or_fallback(&job.game);
                    // The submitter may have stopped waiting.
                    let _ = job.reply.send(action);
                }
                tracing::debug!(target: "mindbug", "agent worker exiting");
            })?;

        Ok(AgentWorker {
            jobs: Some(jobs),
            join_handle: Some(join_handle),
        })
    }

    /// Queue a search of `game`. If the worker is gone the receiver reports
    /// a disconnect instead of a move.
    pub fn submit(&self, game: MindbugGame) -> Receiver<Option<Action>> {
        let (reply, answer) = mpsc::channel();
        if let Some(jobs) = &self.jobs {
            if jobs.send(Job { game, reply }).is_err() {
                tracing::warn!(target: "mindbug", "agent worker is not running, search dropped");
            }
        }
        answer
    }

    /// Stop accepting work and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                tracing::error!(target: "mindbug", "agent worker panicked");
            }
        }
    }
}

impl Drop for AgentWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_answers_and_shuts_down() {
        let config = MCTSConfig::default()
            .with_simulation_time(30.0)
            .with_max_iterations(30);
        let worker = AgentWorker::spawn(config).unwrap();
        let game = MindbugGame::new(21).unwrap();

        let answer = worker.submit(game.clone()).recv().unwrap();
        let action = answer.expect("opening position has moves");
        assert!(game.get_legal_moves().contains(&action));

        worker.shutdown();
    }
}
