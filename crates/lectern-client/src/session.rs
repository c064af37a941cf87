//! User-facing flows over the API and the durable stores.

use crate::{
    ClientConfig, ClientError, CartStore, LibraryApi, Notice, Report, SearchGuard,
};
use chrono::Utc;
use lectern_auth::{AuthStore, AuthUser, Redirect, Role, TokenPair, UserProfile};
use lectern_catalog::prelude::*;
use lectern_data::FetchClient;
use lectern_store::Cache;

pub const SIGNED_IN_MESSAGE: &str = "Successfully signed in!";
pub const SIGNED_UP_MESSAGE: &str = "Account created, you can sign in now";
pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated";

/// A client session: API access plus the signed-in user and the cart.
#[derive(Debug)]
pub struct Session {
    api: LibraryApi,
    auth: AuthStore,
    cart: CartStore,
    search: SearchGuard,
}

impl Session {
    /// Bind to `cache` without reading it; call [`Session::boot`] next.
    pub fn new(api: LibraryApi, cache: Cache) -> Self {
        Self {
            api,
            auth: AuthStore::new(cache.clone()),
            cart: CartStore::new(cache),
            search: SearchGuard::new(),
        }
    }

    /// Build a session from configuration, storing state on disk.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = FetchClient::with_timeout(config.timeout())?.with_base_url(&config.base_url);
        let cache = Cache::open_dir(&config.storage_dir)?;
        Ok(Self::new(LibraryApi::new(client), cache))
    }

    pub fn api(&self) -> &LibraryApi {
        &self.api
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.auth.user()
    }

    /// Restore persisted state and re-attach a still valid token.
    pub fn boot(&mut self) -> Result<(), ClientError> {
        self.auth.rehydrate();
        self.cart.rehydrate()?;

        match self.auth.token().cloned() {
            Some(token) if token.is_expired(Utc::now()) => {
                tracing::info!("stored access token expired");
                self.sign_out()?;
            }
            Some(token) => self.api.client().set_bearer(token.as_str()),
            None => {}
        }
        Ok(())
    }

    // Authentication

    /// Exchange credentials for a token and record the user with their role.
    ///
    /// Any failure, including a storage error after the login call, leaves
    /// the session fully signed out.
    pub async fn sign_in(&mut self, form: &SignInForm) -> Result<Notice, ClientError> {
        form.validate()?;

        let tokens = match self.api.login(form).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!(status = ?e.status(), "login rejected");
                if let Err(cleanup) = self.sign_out() {
                    tracing::warn!(error = %cleanup, "sign-out after rejected login");
                }
                return Err(e);
            }
        };

        if let Err(e) = self.finish_sign_in(form, tokens).await {
            tracing::warn!(error = %e, "sign-in could not be completed");
            if let Err(cleanup) = self.sign_out() {
                tracing::warn!(error = %cleanup, "sign-out after failed sign-in");
            }
            return Err(e);
        }
        Ok(Notice::success(SIGNED_IN_MESSAGE))
    }

    async fn finish_sign_in(
        &mut self,
        form: &SignInForm,
        tokens: TokenPair,
    ) -> Result<(), ClientError> {
        self.api.client().set_bearer(tokens.access.as_str());
        self.auth.store_token(tokens.access)?;

        let (profile, role) = match self.api.me().await {
            Ok(record) => {
                let (profile, role) = record.into_parts();
                (profile, role.unwrap_or_default())
            }
            Err(e) => {
                tracing::warn!(error = %e, "role lookup failed, falling back to USER");
                let profile = UserProfile {
                    id: None,
                    first_name: String::new(),
                    last_name: String::new(),
                    email: form.email.clone(),
                };
                (profile, Role::User)
            }
        };
        self.auth.set_user(profile, role)?;
        Ok(())
    }

    /// Register a new account. The user still signs in afterwards.
    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<Notice, ClientError> {
        form.validate()?;
        let user_id = self.api.signup(form).await?;
        tracing::info!(%user_id, "account created");
        Ok(Notice::success(SIGNED_UP_MESSAGE))
    }

    pub fn sign_out(&mut self) -> Result<Redirect, ClientError> {
        self.api.client().clear_bearer();
        Ok(self.auth.sign_out()?)
    }

    /// Save profile changes and mirror them locally, keeping the role.
    pub async fn edit_profile(&mut self, form: &ProfileEditForm) -> Result<Notice, ClientError> {
        form.validate()?;
        let known = self.auth.user().ok_or(ClientError::NotAuthenticated)?.id();
        let id = match known {
            Some(id) => id,
            None => self.api.me().await?.id.ok_or(ClientError::UnknownUser)?,
        };

        self.api.update_user(id, form).await?;
        self.auth.update_profile(UserProfile {
            id: Some(id),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
        })?;
        Ok(Notice::success(PROFILE_UPDATED_MESSAGE))
    }

    /// Switch the synthetic development user on or off.
    #[cfg(feature = "fake-auth")]
    pub fn set_fake_auth(&mut self, authenticated: bool) -> Result<(), ClientError> {
        lectern_auth::FakeAuth::set_authenticated(&mut self.auth, authenticated)?;
        Ok(())
    }

    // Catalog

    /// Run a search. Returns `None` when a newer search was started meanwhile.
    pub async fn search(&self, query: &BookQuery) -> Result<Option<Vec<Book>>, ClientError> {
        let ticket = self.search.issue();
        let books = self.api.list_books(query).await?;
        Ok(self.search.accept(ticket, books))
    }

    /// Validate a CSV locally, then upload it. Returns the number of books.
    pub async fn import_books(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<usize, ClientError> {
        self.auth.require_admin()?;
        let rows = parse_import_csv(bytes.as_slice())?;
        if rows.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.push("file", "File contains no books");
            return Err(errors.into());
        }
        self.api.upload_books(file_name, bytes).await?;
        Ok(rows.len())
    }

    pub async fn download_report(&self) -> Result<Report, ClientError> {
        self.auth.require_admin()?;
        self.api.download_report().await
    }

    // Complectations
    //
    // Each flow refetches the book after the mutation and re-anchors the
    // selection on the fresh list.

    /// Replace the selected complectation of `book` with `draft` and save the book.
    pub async fn edit_complectation(
        &self,
        book: &Book,
        selection: &mut ComplectationSelection,
        draft: ComplectationDraft,
    ) -> Result<Book, ClientError> {
        self.auth.require_admin()?;
        draft.validate()?;
        let updated = selection.apply_edit(book, draft)?;
        self.api.update_book(book.id, &updated.to_draft()).await?;
        tracing::info!(item = %book.id, complectation = ?selection.id(), "complectation edited");
        self.refresh_book(book.id, selection).await
    }

    /// Add a complectation to `book`. The current selection is kept.
    pub async fn add_complectation(
        &self,
        book: &Book,
        selection: &mut ComplectationSelection,
        draft: ComplectationDraft,
    ) -> Result<Book, ClientError> {
        self.auth.require_admin()?;
        self.api.add_complectation(book.id, &draft).await?;
        tracing::info!(item = %book.id, "complectation added");
        self.refresh_book(book.id, selection).await
    }

    /// Remove the selected complectation. The selection moves to the first
    /// remaining one.
    pub async fn remove_selected_complectation(
        &self,
        book: &Book,
        selection: &mut ComplectationSelection,
    ) -> Result<Book, ClientError> {
        self.auth.require_admin()?;
        let id = selection.removal_target(&book.complectations)?;
        self.api.remove_complectation(id).await?;
        tracing::info!(item = %book.id, complectation = %id, "complectation removed");
        self.refresh_book(book.id, selection).await
    }

    async fn refresh_book(
        &self,
        id: ItemId,
        selection: &mut ComplectationSelection,
    ) -> Result<Book, ClientError> {
        let book = self.api.get_book(id).await?;
        selection.reconcile(&book.complectations);
        Ok(book)
    }

    // Cart

    /// Add a book with the chosen complectation, or its first one.
    pub fn add_to_cart(
        &mut self,
        book: &Book,
        complectation: Option<ComplectationId>,
    ) -> Result<bool, ClientError> {
        let selection = match complectation {
            Some(id) => {
                let mut selection = ComplectationSelection::none();
                selection.select(id);
                selection
            }
            None => ComplectationSelection::first_of(&book.complectations),
        };
        self.cart.add_book(book, &selection)
    }

    pub fn remove_from_cart(&mut self, id: ItemId) -> Result<bool, ClientError> {
        self.cart.remove_item(id)
    }

    pub fn clear_cart(&mut self) -> Result<(), ClientError> {
        self.cart.clear()
    }

    /// Order everything in the cart and empty it.
    pub async fn checkout(&mut self) -> Result<(OrderId, Notice), ClientError> {
        if !self.auth.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }
        let ids = self.cart.ids();
        if ids.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let order_id = self.api.create_order(&ids).await?;
        self.cart.clear()?;
        Ok((
            order_id,
            Notice::success(format!("Order #{} created", order_id)),
        ))
    }

    // Administration

    pub async fn approve_order(&self, id: OrderId) -> Result<(), ClientError> {
        self.auth.require_admin()?;
        self.api.approve_order(id).await
    }

    pub async fn reject_order(&self, id: OrderId) -> Result<(), ClientError> {
        self.auth.require_admin()?;
        self.api.reject_order(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<lectern_auth::UserRecord>, ClientError> {
        self.auth.require_admin()?;
        self.api.list_users().await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.auth.require_admin()?;
        self.api.delete_user(id).await
    }
}
