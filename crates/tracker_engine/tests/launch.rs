use std::sync::{mpsc, Arc};

use tracker_engine::{
    launch_job, ChannelTransferSink, LaunchError, ReqwestUploader, TransferSignal, UploadPayload,
    UploadSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sink() -> (Arc<ChannelTransferSink>, mpsc::Receiver<TransferSignal>) {
    let (tx, rx) = mpsc::channel();
    (Arc::new(ChannelTransferSink::new(tx)), rx)
}

fn payload() -> UploadPayload {
    UploadPayload {
        file_name: "export.zip".to_string(),
        bytes: vec![1, 2, 3],
        fields: vec![("customer_name".to_string(), "acme".to_string())],
    }
}

#[tokio::test]
async fn launch_resolves_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/batch"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"job_id": "j-55"})),
        )
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(UploadSettings::default());
    let url = format!("{}/ingest/batch", server.uri());
    let (sink, signals) = sink();
    let job_id = launch_job(&uploader, &url, payload(), sink)
        .await
        .expect("launch ok");
    assert_eq!(job_id, "j-55");

    let signals: Vec<TransferSignal> = signals.try_iter().collect();
    assert_eq!(signals.last(), Some(&TransferSignal::BodyFlushed));
}

#[tokio::test]
async fn missing_job_id_is_a_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(UploadSettings::default());
    let url = format!("{}/ingest/batch", server.uri());
    let (sink, _signals) = sink();
    let err = launch_job(&uploader, &url, payload(), sink)
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::MissingJobId));
}

#[tokio::test]
async fn transport_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/batch"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"detail": "bad zip"})),
        )
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(UploadSettings::default());
    let url = format!("{}/ingest/batch", server.uri());
    let (sink, _signals) = sink();
    let err = launch_job(&uploader, &url, payload(), sink)
        .await
        .unwrap_err();
    match err {
        LaunchError::Transport(err) => assert_eq!(err.message, "bad zip"),
        other => panic!("unexpected error {other:?}"),
    }
}
