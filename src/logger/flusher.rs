// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;

use super::log_impl::Shared;
use crate::Error;

const THREAD_NAME: &str = "logforth-ini-flusher";

/// A background thread flushing every sink on a fixed interval.
#[derive(Debug)]
pub(super) struct PeriodicFlusher {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicFlusher {
    pub(super) fn spawn(shared: Arc<Shared>, secs: u64) -> Result<Self, Error> {
        let (shutdown, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let ticker = crossbeam_channel::tick(Duration::from_secs(secs));
        let handle = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                loop {
                    crossbeam_channel::select! {
                        recv(ticker) -> _ => shared.flush(),
                        // disconnected when the owner drops the sender
                        recv(shutdown_rx) -> _ => break,
                    }
                }
            })
            .map_err(|err| {
                Error::new(
                    crate::ErrorKind::Unexpected,
                    "failed to spawn the periodic flusher thread",
                )
                .with_source(err)
            })?;

        Ok(Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }
}

impl Drop for PeriodicFlusher {
    fn drop(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU8;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    use super::*;
    use crate::append::Append;
    use crate::detail::FilenameType;
    use crate::logger::log_impl::Sink;
    use crate::logger::log_impl::SinkKind;
    use crate::record::Level;
    use crate::record::LevelFilter;
    use crate::record::Record;
    use crate::trap::DefaultTrap;

    #[derive(Debug)]
    struct CountingAppend(Arc<AtomicUsize>);

    impl Append for CountingAppend {
        fn append(&self, _: &Record) -> Result<(), Error> {
            Ok(())
        }

        fn flush(&self) -> Result<(), Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_flusher_ticks_and_stops() {
        let flushes = Arc::new(AtomicUsize::new(0));
        let sink = Sink::new(
            SinkKind::Console { color: false },
            Level::Trace,
            "%v",
            CountingAppend(flushes.clone()),
        );
        let shared = Arc::new(Shared {
            name: "test".to_string(),
            level: LevelFilter::Trace,
            flush_on: Level::Critical,
            detailed_min: AtomicU8::new(LevelFilter::Off as u8),
            filename_type: FilenameType::NameOnly,
            sinks: vec![sink],
            trap: Arc::new(DefaultTrap::default()),
        });

        let flusher = PeriodicFlusher::spawn(shared, 1).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while flushes.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(flushes.load(Ordering::SeqCst) >= 1);

        let started = Instant::now();
        drop(flusher);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
