//! Workspace, file and agent endpoints.
//!
//! Plain request/response calls; failures surface as [`Error::Remote`] with
//! the HTTP status so they map onto [`Notice`](crate::notice::Notice)s the
//! same way stream failures do.

use crate::types::workspace::{ConfirmedFile, FileRow, TempUpload, Workspace, WorkspaceSummary};
use crate::{Error, ErrorContext, Result};
use serde_json::json;

use super::core::ChatClient;

impl ChatClient {
    pub async fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>> {
        self.http.get_json("/workspace.summary").await
    }

    pub async fn get_workspace(&self, uuid: &str) -> Result<Workspace> {
        self.http.get_json(&format!("/workspace/{}", uuid)).await
    }

    /// Rename a workspace. The name is trimmed; a blank name is rejected
    /// without contacting the server. Returns the name that was stored.
    pub async fn rename_workspace(&self, uuid: &str, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation_with_context(
                "workspace name must not be blank",
                ErrorContext::new()
                    .with_field_path("name")
                    .with_source("workspace_api"),
            ));
        }
        self.http
            .post_unit(&format!("/workspace.rename/{}", uuid), &json!({ "name": name }))
            .await?;
        Ok(name.to_string())
    }

    pub async fn delete_workspace(&self, uuid: &str) -> Result<()> {
        self.http.delete(&format!("/workspace/{}", uuid)).await
    }

    pub async fn fs_list(&self) -> Result<Vec<FileRow>> {
        self.http.get_json("/fs.ls").await
    }

    /// Upload a file to the staging area; confirm it with [`fs_confirm_upload`](Self::fs_confirm_upload).
    pub async fn fs_temp_upload(
        &self,
        name: &str,
        file_name: &str,
        contents: Vec<u8>,
        summary: Option<&str>,
    ) -> Result<TempUpload> {
        let mut form = reqwest::multipart::Form::new().text("name", name.to_string());
        if let Some(summary) = summary {
            form = form.text("summary", summary.to_string());
        }
        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string());
        form = form.part("file", part);
        self.http.post_multipart("/fs.temp_upload", form).await
    }

    pub async fn fs_confirm_upload(
        &self,
        temp_uuid: &str,
        name: &str,
        summary: &str,
    ) -> Result<ConfirmedFile> {
        self.http
            .post_json(
                &format!("/fs.confirm_upload/{}", temp_uuid),
                &json!({ "name": name, "summary": summary }),
            )
            .await
    }

    pub async fn fs_download_url(&self, file_uuid: &str) -> Result<String> {
        self.http
            .get_json(&format!("/fs.download_file/{}", file_uuid))
            .await
    }

    /// Ask the backend to propose a topic name for a workspace.
    pub async fn agent_make_topic(&self, workspace_uuid: &str) -> Result<String> {
        self.http
            .get_json(&format!("/agent.topic_maker/{}", workspace_uuid))
            .await
    }

    /// Ask the backend to summarise a staged upload.
    pub async fn agent_summarise_file(&self, temp_uuid: &str) -> Result<String> {
        self.http
            .get_json(&format!("/agent.summarise_file/{}", temp_uuid))
            .await
    }
}
