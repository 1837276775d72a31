use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use sysinfo::System;

use crate::config::Config;
use crate::models::MemoryUsage;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    started_at: Instant,
    last_transaction_millis: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            last_transaction_millis: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// `txn_<unix millis>`, bumped past the last issued value on collision.
    pub fn next_transaction_id(&self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let previous = match self.last_transaction_millis.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |last| Some(now.max(last + 1)),
        ) {
            Ok(previous) | Err(previous) => previous,
        };
        format!("txn_{}", now.max(previous + 1))
    }
}

pub fn memory_usage() -> MemoryUsage {
    let mut system = System::new();
    system.refresh_memory();

    let (rss, virtual_memory) = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| {
            system.refresh_process(pid);
            system
                .process(pid)
                .map(|process| (process.memory(), process.virtual_memory()))
        })
        .unwrap_or_default();

    MemoryUsage {
        rss,
        virtual_memory,
        system_total: system.total_memory(),
        system_used: system.used_memory(),
    }
}
