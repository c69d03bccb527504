#![allow(dead_code)]

use std::sync::Mutex;

use group_update::engine::types::{VectorContext, ScalarContext};
use group_update::engine::error::ExecutionResult;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// One observed phase execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Scalar { index: i64, group_size: usize },
    Vector { position: usize, entity: u32, index: i64 },
}

/// Thread-safe log of phase executions.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn scalar(&self, ctx: &ScalarContext) -> ExecutionResult<()> {
        self.events.lock().unwrap().push(Event::Scalar {
            index: ctx.vectorisation_index().get(),
            group_size: ctx.group_size(),
        });
        Ok(())
    }

    pub fn vector(&self, ctx: &VectorContext) -> ExecutionResult<()> {
        self.events.lock().unwrap().push(Event::Vector {
            position: ctx.position(),
            entity: ctx.entity(),
            index: ctx.vectorisation_index().get(),
        });
        Ok(())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn scalar_count(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, Event::Scalar { .. })).count()
    }

    pub fn vector_events(&self) -> Vec<(usize, u32, i64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Vector { position, entity, index } => Some((position, entity, index)),
                Event::Scalar { .. } => None,
            })
            .collect()
    }
}
