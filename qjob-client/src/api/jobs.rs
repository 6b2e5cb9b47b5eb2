//! Job-related API endpoints

use async_trait::async_trait;
use qjob_core::domain::job::JobDetails;
use qjob_core::dto::job::JobPage;

use super::{JobsApi, QuantumClient};
use crate::error::Result;

impl QuantumClient {
    fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.workspace_url(), job_id)
    }
}

#[async_trait]
impl JobsApi for QuantumClient {
    async fn create(&self, job_id: &str, details: &JobDetails) -> Result<JobDetails> {
        let request = self.client.put(self.job_url(job_id)).json(details);
        let response = self.authorize(request).await?.send().await?;

        self.handle_response(response).await
    }

    async fn get(&self, job_id: &str) -> Result<JobDetails> {
        let request = self.client.get(self.job_url(job_id));
        let response = self.authorize(request).await?.send().await?;

        self.handle_response(response).await
    }

    async fn cancel(&self, job_id: &str) -> Result<()> {
        let request = self.client.delete(self.job_url(job_id));
        let response = self.authorize(request).await?.send().await?;

        self.handle_empty_response(response).await
    }

    async fn list_page(&self, next_link: Option<&str>) -> Result<JobPage> {
        // Continuation links are absolute and already carry their query
        let response = match next_link {
            Some(link) => {
                let token = self.credential.token().await?;
                self.client.get(link).bearer_auth(token).send().await?
            }
            None => {
                let request = self.client.get(format!("{}/jobs", self.workspace_url()));
                self.authorize(request).await?.send().await?
            }
        };

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qjob_core::domain::job::JobStatus;
    use qjob_core::domain::workspace::WorkspaceId;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::credential::StaticTokenCredential;
    use crate::error::ClientError;

    const WS_PATH: &str =
        "/v1.0/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Quantum/workspaces/ws";

    fn client(server: &MockServer) -> QuantumClient {
        QuantumClient::new(
            server.uri(),
            WorkspaceId::new("sub", "rg", "ws").unwrap(),
            Arc::new(StaticTokenCredential::new("test-token")),
        )
    }

    #[tokio::test]
    async fn test_get_job() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{}/jobs/job-1", WS_PATH)))
            .and(header("authorization", "Bearer test-token"))
            .and(query_param("api-version", crate::api::API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "job-1",
                "name": "bell",
                "status": "Executing",
                "providerId": "ionq",
                "target": "ionq.simulator"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let details = client(&server).get("job-1").await.unwrap();
        assert_eq!(details.id, "job-1");
        assert_eq!(details.status, Some(JobStatus::Executing));
    }

    #[tokio::test]
    async fn test_create_job_puts_details() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("{}/jobs/job-2", WS_PATH)))
            .and(body_partial_json(serde_json::json!({
                "id": "job-2",
                "target": "microsoft.simulator.fullstate"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "job-2",
                "name": "sample",
                "status": "Waiting",
                "target": "microsoft.simulator.fullstate"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let details = JobDetails::new(
            "job-2",
            "sample",
            "Microsoft.Simulator",
            "microsoft.simulator.fullstate",
            "https://acct.blob.core.windows.net/job-2",
            "qir.v1/full-profile",
            "microsoft.qio-results.v2",
        );
        let created = client(&server).create("job-2", &details).await.unwrap();
        assert_eq!(created.status, Some(JobStatus::Waiting));
    }

    #[tokio::test]
    async fn test_cancel_job() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/jobs/job-3", WS_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).cancel("job-3").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;
        let next = format!("{}/jobs/page2", server.uri());

        Mock::given(method("GET"))
            .and(path(format!("{}/jobs", WS_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{ "id": "a" }],
                "nextLink": next
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/jobs/page2"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{ "id": "b" }]
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let first = client.list_page(None).await.unwrap();
        assert_eq!(first.value[0].id, "a");

        let second = client.list_page(first.next()).await.unwrap();
        assert_eq!(second.value[0].id, "b");
        assert_eq!(second.next(), None);
    }

    #[tokio::test]
    async fn test_api_error_is_propagated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("job not found"))
            .mount(&server)
            .await;

        let err = client(&server).get("missing").await.unwrap_err();
        assert!(err.is_not_found());
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "job not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server).get("job-1").await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }
}
