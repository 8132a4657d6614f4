use core::{future::Future, num::NonZero};
use std::thread::Builder;

use anyhow::{anyhow, Error};

/// Represents a thread pool running a single task per thread.
///
/// Each thread drives its task on a dedicated current-thread tokio runtime.
#[derive(Debug)]
pub struct ThreadPool<F> {
    num_threads: NonZero<usize>,
    factory: F,
}

impl<F> ThreadPool<F> {
    pub fn new(num_threads: NonZero<usize>, factory: F) -> Self {
        Self { num_threads, factory }
    }
}

impl<F, U, T> ThreadPool<F>
where
    F: FnMut(usize) -> U,
    U: FnOnce() -> T + Send + 'static,
    T: Future<Output = ()>,
{
    /// Runs this [`ThreadPool`] by spawning threads and waiting for them to
    /// complete.
    pub fn run(mut self) -> Result<(), Error> {
        let num_threads = self.num_threads.get();
        let mut threads = Vec::with_capacity(num_threads);

        for idx in 0..num_threads {
            let thread = {
                let task = (self.factory)(idx);

                Builder::new()
                    .name(format!("flood:w{idx:02}"))
                    .spawn(move || -> Result<(), Error> {
                        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                        runtime.block_on(task());

                        Ok(())
                    })?
            };

            threads.push(thread);
        }

        for thread in threads {
            thread.join().map_err(|_| anyhow!("worker thread panicked"))??;
        }

        Ok(())
    }
}
