//! WebSocket を使った Connection 実装
//!
//! ## 責務
//!
//! - axum の `WebSocket` を読み取り側と書き込み側に分割する
//! - axum の `Message` と Domain 層の `Frame` を相互に変換する
//!
//! ## 設計ノート
//!
//! WebSocket の生成（アップグレード）は UI 層で行われます。
//! この実装は生成済みの `WebSocket` を受け取り、分割した片側ずつを
//! reader タスクと writer タスクに渡します。

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::domain::{ConnectionError, ConnectionReader, ConnectionWriter, Frame};

/// Read half of an upgraded WebSocket.
pub struct WebSocketReader {
    stream: SplitStream<WebSocket>,
}

/// Write half of an upgraded WebSocket.
pub struct WebSocketWriter {
    sink: SplitSink<WebSocket, Message>,
    closed: bool,
}

/// Split an upgraded WebSocket into its two halves.
pub fn split_websocket(socket: WebSocket) -> (WebSocketReader, WebSocketWriter) {
    let (sink, stream) = socket.split();
    (
        WebSocketReader { stream },
        WebSocketWriter {
            sink,
            closed: false,
        },
    )
}

#[async_trait]
impl ConnectionReader for WebSocketReader {
    async fn read_frame(&mut self) -> Option<Result<Frame, ConnectionError>> {
        let message = self.stream.next().await?;
        Some(
            message
                .map(frame_from_message)
                .map_err(|e| ConnectionError::Transport(e.to_string())),
        )
    }
}

#[async_trait]
impl ConnectionWriter for WebSocketWriter {
    async fn write_frame(&mut self, frame: Frame) -> Result<(), ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        self.sink
            .send(message_from_frame(frame))
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.sink
            .close()
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))
    }
}

fn frame_from_message(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Message(Bytes::copy_from_slice(text.as_str().as_bytes())),
        Message::Binary(data) => Frame::Message(data),
        Message::Ping(data) => Frame::Ping(data),
        Message::Pong(data) => Frame::Pong(data),
        Message::Close(_) => Frame::Close,
    }
}

/// Convert a frame to a WebSocket message.
///
/// Payloads are sent as text when they are valid UTF-8, as binary otherwise.
fn message_from_frame(frame: Frame) -> Message {
    match frame {
        Frame::Message(payload) => match std::str::from_utf8(&payload) {
            Ok(text) => Message::Text(text.into()),
            Err(_) => Message::Binary(payload),
        },
        Frame::Ping(data) => Message::Ping(data),
        Frame::Pong(data) => Message::Pong(data),
        Frame::Close => Message::Close(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_becomes_message_frame() {
        // テスト項目: テキストメッセージはペイロードを保ったまま Message フレームになる
        // given (前提条件):
        let message = Message::Text("hello".into());

        // when (操作):
        let frame = frame_from_message(message);

        // then (期待する結果):
        assert_eq!(frame, Frame::Message(Bytes::from_static(b"hello")));
    }

    #[test]
    fn test_control_messages_become_control_frames() {
        // テスト項目: ping / pong / close がそれぞれ対応するフレームになる
        // given (前提条件):
        let ping = Message::Ping(Bytes::from_static(b"p"));
        let pong = Message::Pong(Bytes::from_static(b"q"));
        let close = Message::Close(None);

        // when (操作):
        let frames = [
            frame_from_message(ping),
            frame_from_message(pong),
            frame_from_message(close),
        ];

        // then (期待する結果):
        assert_eq!(frames[0], Frame::Ping(Bytes::from_static(b"p")));
        assert_eq!(frames[1], Frame::Pong(Bytes::from_static(b"q")));
        assert_eq!(frames[2], Frame::Close);
    }

    #[test]
    fn test_utf8_payload_is_sent_as_text() {
        // テスト項目: UTF-8 のペイロードはテキストメッセージとして送信される
        // given (前提条件):
        let frame = Frame::Message(Bytes::from("hi\nthere"));

        // when (操作):
        let message = message_from_frame(frame);

        // then (期待する結果):
        match message {
            Message::Text(text) => assert_eq!(text.as_str(), "hi\nthere"),
            other => panic!("expected text message, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_payload_is_sent_as_binary() {
        // テスト項目: UTF-8 でないペイロードはバイナリメッセージとして送信される
        // given (前提条件):
        let payload = Bytes::from_static(&[0xff, 0xfe]);
        let frame = Frame::Message(payload.clone());

        // when (操作):
        let message = message_from_frame(frame);

        // then (期待する結果):
        match message {
            Message::Binary(data) => assert_eq!(data, payload),
            other => panic!("expected binary message, got {:?}", other),
        }
    }

    #[test]
    fn test_close_frame_becomes_close_message_without_reason() {
        // テスト項目: close フレームは理由なしの close メッセージになる
        // given (前提条件):
        let frame = Frame::Close;

        // when (操作):
        let message = message_from_frame(frame);

        // then (期待する結果):
        assert!(matches!(message, Message::Close(None)));
    }
}
