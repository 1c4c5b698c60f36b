//! Full client → reqwest → HTTP server → decode path.

use std::time::Duration;

use client::{AnnotateError, AnnotationClient};
use mockito::Matcher;
use protocol::{
    codec, CallContext, Document, RequestProperties, Sentence, Token, TransportError,
    PROPERTIES_PARAM,
};
use transport::{HttpExecutorConfig, ReqwestExecutor};

const FOX: &str = "the quick brown fox jumps over the lazy dog";

fn executor() -> ReqwestExecutor {
    ReqwestExecutor::new(&HttpExecutorConfig::default()).expect("executor builds")
}

fn properties_json(annotators: &[&str]) -> String {
    RequestProperties::for_annotators(annotators)
        .to_query_value()
        .expect("serializes")
}

/// Accepts connections and never answers, so only the call's own deadline
/// or cancellation can end an exchange against it.
async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn annotate_round_trips_through_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::UrlEncoded(
            PROPERTIES_PARAM.to_string(),
            properties_json(&["tokenize", "ssplit", "pos"]),
        ))
        .match_header("content-type", "application/x-protobuf")
        .with_status(200)
        .with_body(codec::encode(&Document::with_text(FOX)))
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    let doc = client
        .annotate(&CallContext::background(), FOX, &["tokenize", "ssplit", "pos"])
        .await
        .expect("annotates");

    assert_eq!(doc.text.as_deref(), Some(FOX));
    mock.assert_async().await;
}

#[tokio::test]
async fn annotate_decodes_sentences_and_tokens() {
    let response = Document {
        sentence: vec![Sentence {
            token_offset_begin: Some(0),
            token_offset_end: Some(2),
            sentence_index: Some(0),
            token: vec![
                Token {
                    word: Some("Hello".to_string()),
                    pos: Some("UH".to_string()),
                    ..Token::default()
                },
                Token {
                    word: Some("world".to_string()),
                    pos: Some("NN".to_string()),
                    ..Token::default()
                },
            ],
            ..Sentence::default()
        }],
        ..Document::with_text("Hello world")
    };

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(codec::encode(&response))
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    let doc = client
        .annotate(&CallContext::background(), "Hello world", &["tokenize", "ssplit", "pos"])
        .await
        .expect("annotates");

    assert_eq!(doc, response);
}

#[tokio::test]
async fn duplicate_annotators_reach_the_server_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::UrlEncoded(
            PROPERTIES_PARAM.to_string(),
            properties_json(&["tokenize", "tokenize"]),
        ))
        .with_status(200)
        .with_body(codec::encode(&Document::with_text("x")))
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    client
        .annotate(&CallContext::background(), "x", &["tokenize", "tokenize"])
        .await
        .expect("annotates");

    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("something failed")
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    let err = client
        .annotate(&CallContext::background(), "", &["tokenize", "ssplit", "pos"])
        .await
        .unwrap_err();

    match &err {
        AnnotateError::Server { status_code, body } => {
            assert_eq!(*status_code, 500);
            assert_eq!(body, "something failed");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("500"));
    assert!(msg.contains("something failed"));
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    let err = client
        .annotate(&CallContext::background(), "x", &["tokenize"])
        .await
        .unwrap_err();

    assert!(matches!(err, AnnotateError::Decode(_)));
}

#[tokio::test]
async fn deadline_ends_a_hanging_exchange() {
    let address = silent_server().await;
    let client = AnnotationClient::new(&address, executor()).expect("client");

    let ctx = CallContext::background().with_timeout(Duration::from_millis(200));
    let err = client
        .annotate(&ctx, "x", &["tokenize"])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnnotateError::Transport(TransportError::DeadlineExceeded)
    ));
    assert!(err.retry_policy().is_retryable());
}

#[tokio::test]
async fn client_wide_timeout_is_reported_as_deadline() {
    let address = silent_server().await;
    let executor = ReqwestExecutor::new(&HttpExecutorConfig {
        timeout: Some(Duration::from_millis(200)),
        ..HttpExecutorConfig::default()
    })
    .expect("executor");
    let client = AnnotationClient::new(&address, executor).expect("client");

    let err = client
        .annotate(&CallContext::background(), "x", &["tokenize"])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnnotateError::Transport(TransportError::DeadlineExceeded)
    ));
}

#[tokio::test]
async fn cancellation_ends_only_its_own_call() {
    let address = silent_server().await;
    let client = AnnotationClient::new(&address, executor()).expect("client");

    let root = CallContext::background();
    let cancelled = root.child();
    let bounded = root.child().with_timeout(Duration::from_millis(400));

    let trigger = cancelled.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let (first, second) = tokio::join!(
        client.annotate(&cancelled, "x", &["tokenize"]),
        client.annotate(&bounded, "y", &["tokenize"]),
    );

    assert!(matches!(
        first,
        Err(AnnotateError::Transport(TransportError::Cancelled))
    ));
    // The sibling call was not cancelled; it ran until its own deadline.
    assert!(matches!(
        second,
        Err(AnnotateError::Transport(TransportError::DeadlineExceeded))
    ));
}

#[tokio::test]
async fn pre_cancelled_context_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let client = AnnotationClient::new(&server.url(), executor()).expect("client");
    let ctx = CallContext::background();
    ctx.cancel();

    let err = client.annotate(&ctx, "x", &["tokenize"]).await.unwrap_err();
    assert!(matches!(
        err,
        AnnotateError::Transport(TransportError::Cancelled)
    ));
    mock.assert_async().await;
}
