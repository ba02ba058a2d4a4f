use std::sync::Arc;

use arc_cell::ArcCell;

/// Latest values pushed by sensor clients. Clones share the same cells.
#[derive(Clone)]
pub struct Readings {
    inner: Arc<ReadingsInner>,
}

struct ReadingsInner {
    temperature: ArcCell<String>,
}

impl Default for Readings {
    fn default() -> Self {
        Readings {
            inner: Arc::new(ReadingsInner {
                temperature: ArcCell::new(Arc::new(models::routes::NO_READING.to_string())),
            }),
        }
    }
}

impl Readings {
    pub fn temperature(&self) -> Arc<String> {
        self.inner.temperature.get()
    }

    pub fn set_temperature(&self, value: impl Into<String>) {
        self.inner.temperature.set(Arc::new(value.into()));
    }
}
