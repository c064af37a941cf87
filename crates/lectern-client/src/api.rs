//! Library backend endpoints.

use crate::ClientError;
use lectern_auth::{TokenPair, UserRecord};
use lectern_catalog::prelude::*;
use lectern_data::{FetchClient, Part};
use serde::Deserialize;

/// Name used when the report response does not suggest one.
pub const DEFAULT_REPORT_FILE_NAME: &str = "app-analytics.docx";

/// A downloaded analytics report.
#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct OrderCreated {
    order_id: OrderId,
}

#[derive(Deserialize)]
struct SignedUp {
    user_id: UserId,
}

/// Typed access to the backend's REST endpoints.
///
/// Every call goes through the shared [`FetchClient`], so the bearer token set
/// after sign-in applies to all of them.
#[derive(Debug, Clone)]
pub struct LibraryApi {
    client: FetchClient,
}

impl LibraryApi {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    // Books

    pub async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>, ClientError> {
        let pairs = query.to_query_pairs();
        tracing::debug!(params = pairs.len(), "listing books");
        Ok(self.client.get("books/").query_all(pairs).send_json().await?)
    }

    pub async fn get_book(&self, id: ItemId) -> Result<Book, ClientError> {
        Ok(self.client.get(format!("books/{}", id)).send_json().await?)
    }

    /// Books currently lent to the signed-in user.
    pub async fn my_books(&self) -> Result<Vec<Book>, ClientError> {
        Ok(self.client.get("books/mine").send_json().await?)
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>, ClientError> {
        Ok(self.client.get("books/authors/").send_json().await?)
    }

    pub async fn create_book(&self, draft: &BookDraft) -> Result<Book, ClientError> {
        draft.validate()?;
        Ok(self.client.post("books").json(draft)?.send_json().await?)
    }

    /// Save a book. The draft's complectations are sent as they are, so an
    /// edited variant travels with the book.
    pub async fn update_book(&self, id: ItemId, draft: &BookDraft) -> Result<(), ClientError> {
        draft.validate()?;
        self.client
            .put(format!("books/{}", id))
            .json(draft)?
            .send_ok()
            .await?;
        Ok(())
    }

    pub async fn delete_item(&self, id: ItemId) -> Result<(), ClientError> {
        self.client.delete(format!("items/{}", id)).send_ok().await?;
        Ok(())
    }

    /// Mark a lent book as returned.
    pub async fn return_book(&self, id: ItemId) -> Result<(), ClientError> {
        self.client
            .post(format!("books/{}/return", id))
            .send_ok()
            .await?;
        Ok(())
    }

    pub async fn fetch_filters(&self) -> Result<Filters, ClientError> {
        Ok(self.client.get("books/filters").send_json().await?)
    }

    /// Upload a `;`-delimited CSV of books.
    pub async fn upload_books(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ClientError> {
        tracing::info!(file_name, size = bytes.len(), "uploading books");
        self.client
            .post("items/upload")
            .multipart(vec![Part::file("file", file_name, "text/csv", bytes)])
            .send_ok()
            .await?;
        Ok(())
    }

    // Complectations

    pub async fn add_complectation(
        &self,
        item: ItemId,
        draft: &ComplectationDraft,
    ) -> Result<(), ClientError> {
        draft.validate()?;
        self.client
            .post(format!("items/{}/complectation", item))
            .json(draft)?
            .send_ok()
            .await?;
        Ok(())
    }

    pub async fn remove_complectation(&self, id: ComplectationId) -> Result<(), ClientError> {
        self.client
            .delete(format!("complectations/{}", id))
            .send_ok()
            .await?;
        Ok(())
    }

    // Orders

    pub async fn list_orders(&self, filter: &StatusFilter) -> Result<Vec<Order>, ClientError> {
        let mut request = self.client.get("orders/");
        if let Some(state) = filter.to_param() {
            request = request.query("state", state);
        }
        Ok(request.send_json().await?)
    }

    /// Place an order for the given items.
    pub async fn create_order(&self, ids: &[ItemId]) -> Result<OrderId, ClientError> {
        let created: OrderCreated = self.client.post("orders/").json(ids)?.send_json().await?;
        tracing::info!(order_id = %created.order_id, items = ids.len(), "order created");
        Ok(created.order_id)
    }

    pub async fn approve_order(&self, id: OrderId) -> Result<(), ClientError> {
        self.client
            .post(format!("orders/{}/approve/", id))
            .send_ok()
            .await?;
        Ok(())
    }

    pub async fn reject_order(&self, id: OrderId) -> Result<(), ClientError> {
        self.client
            .post(format!("orders/{}/reject", id))
            .send_ok()
            .await?;
        Ok(())
    }

    // Auth and users

    pub async fn login(&self, form: &SignInForm) -> Result<TokenPair, ClientError> {
        Ok(self.client.post("auth/login").json(form)?.send_json().await?)
    }

    pub async fn signup(&self, form: &SignUpForm) -> Result<UserId, ClientError> {
        let created: SignedUp = self.client.post("auth/signup").json(form)?.send_json().await?;
        Ok(created.user_id)
    }

    /// The signed-in user as the backend sees them.
    pub async fn me(&self) -> Result<UserRecord, ClientError> {
        Ok(self.client.get("users/me").send_json().await?)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        Ok(self.client.get("users/").send_json().await?)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.client.delete(format!("users/{}", id)).send_ok().await?;
        Ok(())
    }

    pub async fn update_user(&self, id: UserId, form: &ProfileEditForm) -> Result<(), ClientError> {
        self.client
            .put(format!("users/{}", id))
            .json(form)?
            .send_ok()
            .await?;
        Ok(())
    }

    // Analytics

    pub async fn download_report(&self) -> Result<Report, ClientError> {
        let response = self.client.get("analytics/report").send_ok().await?;
        let file_name = response
            .filename()
            .unwrap_or_else(|| DEFAULT_REPORT_FILE_NAME.to_string());
        let content_type = response.content_type().map(str::to_string);
        Ok(Report {
            file_name,
            content_type,
            bytes: response.into_bytes(),
        })
    }
}
