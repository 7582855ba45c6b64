use std::sync::{Arc, Mutex, mpsc};
use std::thread;

type Task = Box<dyn FnOnce() + Send + 'static>;

pub(super) fn default_worker_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().clamp(1, 8))
        .unwrap_or(2)
}

/// FIFO worker pool for collaborator calls. Workers exit once the executor is
/// dropped and the queue drains.
pub(super) struct TaskExecutor {
    tx: mpsc::Sender<Task>,
    _threads: Vec<thread::JoinHandle<()>>,
}

impl TaskExecutor {
    pub(super) fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (tx, rx) = mpsc::channel::<Task>();
        let rx = Arc::new(Mutex::new(rx));

        let mut worker_threads = Vec::with_capacity(threads);
        for index in 0..threads {
            let rx = Arc::clone(&rx);
            let spawned = thread::Builder::new()
                .name(format!("branchscope-worker-{index}"))
                .spawn(move || {
                    loop {
                        let task = {
                            let rx = rx.lock().expect("executor lock poisoned");
                            rx.recv()
                        };
                        match task {
                            Ok(task) => task(),
                            Err(_) => break,
                        }
                    }
                });
            match spawned {
                Ok(handle) => worker_threads.push(handle),
                Err(e) => log::error!("cannot spawn worker thread {index}: {e}"),
            }
        }
        log::debug!("task executor started with {} workers", worker_threads.len());

        Self {
            tx,
            _threads: worker_threads,
        }
    }

    pub(super) fn spawn(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.tx.send(Box::new(task));
    }
}
