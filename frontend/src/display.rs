use std::{future::Future, time::Duration};

use gloo_timers::future::sleep;
use serde_json::Value;
use sycamore::{futures::spawn_local_scoped, prelude::*};

use crate::{
    fetch::{fetch_cycle, DataSource, HttpSource},
    helpers::{empty_payload, payload_text, LOADING},
};

#[derive(Prop)]
pub struct DisplayViewProps {
    /// Prefix for `data/temp` and `data`, normally the page's own origin and path.
    pub base_url: String,
    /// `None` fetches once on mount.
    pub refresh: Option<Duration>,
}

#[component]
pub fn DisplayView<G: Html>(cx: Scope, props: DisplayViewProps) -> View<G> {
    let temperature = create_signal(cx, LOADING.to_string());
    let payload = create_signal(cx, empty_payload());

    start_fetching(
        cx,
        HttpSource::new(props.base_url),
        props.refresh,
        sleep,
        temperature,
        payload,
    );

    view! { cx,
        DisplayPanel(temperature=temperature, payload=payload)
    }
}

/// Runs a fetch cycle now and, with a `refresh` interval, again after every `pause(interval)`.
/// The task belongs to `cx`, so nothing is written once the scope is disposed.
pub fn start_fetching<'a, S, P, F>(
    cx: Scope<'a>,
    source: S,
    refresh: Option<Duration>,
    pause: P,
    temperature: &'a Signal<String>,
    payload: &'a Signal<Value>,
) where
    S: DataSource + 'a,
    P: Fn(Duration) -> F + 'a,
    F: Future<Output = ()>,
{
    spawn_local_scoped(cx, async move {
        loop {
            fetch_cycle(&source, |t| temperature.set(t), |p| payload.set(p)).await;

            let Some(interval) = refresh else { break };
            pause(interval).await;
        }
    });
}

#[derive(Prop)]
pub struct DisplayPanelProps<'a> {
    pub temperature: &'a Signal<String>,
    pub payload: &'a Signal<Value>,
}

#[component]
pub fn DisplayPanel<'a, G: Html>(cx: Scope<'a>, props: DisplayPanelProps<'a>) -> View<G> {
    let temperature = props.temperature;
    let payload = props.payload;
    let payload_json = create_memo(cx, move || payload_text(&payload.get()));

    view! { cx,
        div(class="home") {
            div(class="info") { "Temperature: " (temperature.get()) }
            div(class="info") { (payload_json.get()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use anyhow::anyhow;
    use serde_json::json;
    use tokio::{sync::Notify, task::LocalSet, time::sleep};

    use super::*;

    /// Counts finished reads. Each read first waits for `gate` when one is set.
    #[derive(Clone, Default)]
    struct Counting {
        temperature_reads: Rc<Cell<usize>>,
        payload_reads: Rc<Cell<usize>>,
        gate: Option<Rc<Notify>>,
        fail_temperature: bool,
    }

    impl DataSource for Counting {
        async fn temperature(&self) -> anyhow::Result<String> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.temperature_reads.set(self.temperature_reads.get() + 1);
            if self.fail_temperature {
                return Err(anyhow!("status 500"));
            }
            Ok(format!("{}F", 70 + self.temperature_reads.get()))
        }

        async fn payload(&self) -> anyhow::Result<Value> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.payload_reads.set(self.payload_reads.get() + 1);
            Ok(json!({"cycle": self.payload_reads.get()}))
        }
    }

    /// Latest signal values, copied out of the scope by an effect.
    #[derive(Clone, Default)]
    struct Seen {
        temperature: Rc<RefCell<String>>,
        payload: Rc<RefCell<String>>,
    }

    fn mount(source: Counting, refresh: Option<Duration>, seen: Seen) -> ScopeDisposer<'static> {
        create_scope(move |cx| {
            let temperature = create_signal(cx, LOADING.to_string());
            let payload = create_signal(cx, empty_payload());

            start_fetching(cx, source, refresh, sleep, temperature, payload);

            create_effect(cx, move || {
                *seen.temperature.borrow_mut() = (*temperature.get()).clone();
                *seen.payload.borrow_mut() = payload_text(&payload.get());
            });
        })
    }

    #[tokio::test]
    async fn mount_fetches_exactly_once() {
        LocalSet::new()
            .run_until(async {
                let source = Counting::default();
                let seen = Seen::default();
                let disposer = mount(source.clone(), None, seen.clone());

                sleep(Duration::from_millis(100)).await;

                assert_eq!(source.temperature_reads.get(), 1);
                assert_eq!(source.payload_reads.get(), 1);
                assert_eq!(*seen.temperature.borrow(), "71F");
                assert_eq!(*seen.payload.borrow(), r#"{"cycle":1}"#);

                unsafe { disposer.dispose() };
            })
            .await;
    }

    #[tokio::test]
    async fn failed_read_leaves_placeholder_on_screen() {
        LocalSet::new()
            .run_until(async {
                let source = Counting {
                    fail_temperature: true,
                    ..Default::default()
                };
                let seen = Seen::default();
                let disposer = mount(source.clone(), None, seen.clone());

                sleep(Duration::from_millis(100)).await;

                assert_eq!(source.temperature_reads.get(), 1);
                assert_eq!(*seen.temperature.borrow(), LOADING);
                assert_eq!(*seen.payload.borrow(), r#"{"cycle":1}"#);

                unsafe { disposer.dispose() };
            })
            .await;
    }

    #[tokio::test]
    async fn refresh_interval_repeats_the_cycle() {
        LocalSet::new()
            .run_until(async {
                let source = Counting::default();
                let seen = Seen::default();
                let disposer = mount(source.clone(), Some(Duration::from_millis(10)), seen.clone());

                sleep(Duration::from_millis(200)).await;
                let cycles = source.payload_reads.get();
                assert!(cycles >= 3, "only {cycles} cycles ran");
                assert_eq!(*seen.payload.borrow(), format!(r#"{{"cycle":{cycles}}}"#));

                unsafe { disposer.dispose() };

                sleep(Duration::from_millis(100)).await;
                assert_eq!(source.payload_reads.get(), cycles);
            })
            .await;
    }

    #[tokio::test]
    async fn disposed_view_is_never_updated() {
        LocalSet::new()
            .run_until(async {
                let gate = Rc::new(Notify::new());
                let source = Counting {
                    gate: Some(gate.clone()),
                    ..Default::default()
                };
                let seen = Seen::default();
                let disposer = mount(source.clone(), None, seen.clone());

                // Both reads are now parked on the gate.
                sleep(Duration::from_millis(50)).await;
                unsafe { disposer.dispose() };

                gate.notify_waiters();
                gate.notify_one();
                sleep(Duration::from_millis(50)).await;

                assert_eq!(source.temperature_reads.get(), 0);
                assert_eq!(source.payload_reads.get(), 0);
                assert_eq!(*seen.temperature.borrow(), LOADING);
                assert_eq!(*seen.payload.borrow(), "{}");
            })
            .await;
    }

    #[test]
    fn panel_starts_with_placeholders() {
        let html = sycamore::render_to_string(|cx| {
            let temperature = create_signal(cx, LOADING.to_string());
            let payload = create_signal(cx, empty_payload());
            view! { cx, DisplayPanel(temperature=temperature, payload=payload) }
        });

        assert!(html.contains("Temperature: "));
        assert!(html.contains("Loading..."));
        assert!(html.contains("{}"));
    }

    #[test]
    fn panel_shows_fetched_values() {
        let html = sycamore::render_to_string(|cx| {
            let temperature = create_signal(cx, "72F".to_string());
            let payload = create_signal(cx, json!({"a": 1}));
            view! { cx, DisplayPanel(temperature=temperature, payload=payload) }
        });

        assert!(html.contains("72F"));
        assert!(!html.contains("Loading..."));
        assert!(html.contains(r#"{"a":1}"#) || html.contains("{&quot;a&quot;:1}"));
    }
}
