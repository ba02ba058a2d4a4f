use std::net::SocketAddr;

use futures_util::StreamExt;
use tracing::Instrument;
use warp::{
    filters::{
        ws::{Message, WebSocket, Ws},
        BoxedFilter,
    },
    Filter, Reply,
};

use crate::readings::Readings;

/// Accepts sensor connections on any path. Every text frame becomes the current temperature.
pub fn routes(readings: &Readings) -> BoxedFilter<(impl Reply,)> {
    let readings = readings.clone();
    warp::ws()
        .and(warp::addr::remote())
        .map(move |ws: Ws, peer: Option<SocketAddr>| {
            let readings = readings.clone();
            ws.on_upgrade(move |socket| {
                handle_connection(socket, readings)
                    .instrument(tracing::info_span!("sensor", peer = ?peer))
            })
        })
        .boxed()
}

async fn handle_connection(mut socket: WebSocket, readings: Readings) {
    tracing::info!("sensor connected");

    while let Some(message) = socket.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("dropping sensor connection: {e}");
                return;
            }
        };

        if let Some(reading) = reading_from(&message) {
            tracing::debug!(reading, "temperature updated");
            readings.set_temperature(reading);
        }
    }

    tracing::info!("sensor disconnected");
}

fn reading_from(message: &Message) -> Option<&str> {
    if let Ok(text) = message.to_str() {
        return Some(text);
    }

    if !message.is_binary() {
        return None;
    }

    match std::str::from_utf8(message.as_bytes()) {
        Ok(text) => Some(text),
        Err(_) => {
            tracing::warn!(len = message.as_bytes().len(), "ignoring non utf-8 frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn wait_for(readings: &Readings, expected: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while *readings.temperature() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("temperature never became {expected:?}"));
    }

    #[tokio::test]
    async fn text_frames_replace_the_temperature() {
        let readings = Readings::default();
        let mut client = warp::test::ws()
            .path("/")
            .handshake(routes(&readings))
            .await
            .expect("handshake");

        client.send_text("42.5").await;
        wait_for(&readings, "42.5").await;

        client.send(Message::binary(b"43.0".to_vec())).await;
        wait_for(&readings, "43.0").await;
    }

    #[test]
    fn only_text_like_frames_are_readings() {
        assert_eq!(reading_from(&Message::text("61.2")), Some("61.2"));
        assert_eq!(reading_from(&Message::binary(b"61.3".to_vec())), Some("61.3"));
        assert_eq!(reading_from(&Message::binary(vec![0xff, 0xfe])), None);
        assert_eq!(reading_from(&Message::ping(Vec::new())), None);
        assert_eq!(reading_from(&Message::close()), None);
    }
}
