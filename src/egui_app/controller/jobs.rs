use crate::generation::{GenerationError, GenerationReply, GenerationRequest, GenerationService};
use std::sync::{
    Arc,
    mpsc::{Receiver, Sender, TryRecvError},
};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

pub(crate) enum JobMessage {
    GenerationFinished(GenerationJobResult),
}

#[derive(Debug)]
pub(crate) struct GenerationJobResult {
    pub(crate) request: GenerationRequest,
    pub(crate) outcome: Result<GenerationReply, GenerationError>,
}

/// Background work owned by the controller. Results come back over a single
/// channel drained once per frame.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    generation_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            generation_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn generation_in_progress(&self) -> bool {
        self.generation_in_progress
    }

    pub(super) fn begin_generation(
        &mut self,
        service: Arc<dyn GenerationService>,
        request: GenerationRequest,
    ) {
        if self.generation_in_progress {
            return;
        }
        self.generation_in_progress = true;
        let tx = self.message_tx.clone();
        let fallback = request.clone();
        let spawned = thread::Builder::new()
            .name("netlens-generation".into())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| service.generate(&request)))
                    .unwrap_or_else(|_| {
                        tracing::error!("Generation service panicked");
                        Err(GenerationError::Disconnected)
                    });
                let _ = tx.send(JobMessage::GenerationFinished(GenerationJobResult {
                    request,
                    outcome,
                }));
            });
        if let Err(err) = spawned {
            tracing::error!("Failed to spawn generation worker: {err}");
            let _ = self
                .message_tx
                .send(JobMessage::GenerationFinished(GenerationJobResult {
                    request: fallback,
                    outcome: Err(GenerationError::Disconnected),
                }));
        }
    }

    pub(super) fn clear_generation(&mut self) {
        self.generation_in_progress = false;
    }
}
