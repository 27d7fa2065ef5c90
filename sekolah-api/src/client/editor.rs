//! generic list and edit flow shared by every entity page
//!
//! one page of records is fetched from the server at a time. search and
//! sort only rearrange what is on that page. every row carries the access
//! the current session has to it and writes are refused locally when that
//! access does not allow them.

use std::cmp::Ordering;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use sekolah_lib::query::{self, Metadata, PageQuery};
use sekolah_lib::sec::{Access, Scope};

use crate::Payload;
use crate::resources::{Id, Resource};

use super::ApiClient;
use super::body::{Body, FileUpload};
use super::error::RequestError;
use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Populated,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// the order the server returned
    #[default]
    Server,
    Label,
    Newest,
    Oldest,
}

#[derive(Debug, Clone)]
pub struct Row<T> {
    pub record: T,
    pub access: Access,
}

/// fields of a create or update, plus an optional file to upload with them
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub fields: Map<String, Value>,
    pub file: Option<FileUpload>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Draft {
            fields,
            file: None,
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.set(key, value);
        self
    }

    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }

    fn tag(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("not allowed to change this {0}")]
    Forbidden(&'static str),

    #[error("{0} {1} is not on the current page")]
    NotLoaded(&'static str, Id),

    #[error("{0} cannot be published")]
    NotPublishable(&'static str),

    #[error(transparent)]
    Request(#[from] RequestError),
}

pub struct ListEditor<R: Resource> {
    api: ApiClient,
    session: Arc<Session>,
    cancel: CancellationToken,
    query: PageQuery,
    search: Option<String>,
    sort: SortBy,
    rows: Vec<Row<R::Record>>,
    metadata: Metadata,
    view: ViewState,
    write: WriteState,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ListEditor<R> {
    pub fn new(session: Arc<Session>, limit: u32) -> Self {
        let cancel = CancellationToken::new();
        let api = session.api().scoped(cancel.clone());
        let query = PageQuery::new(1, limit);

        ListEditor {
            api,
            session,
            cancel,
            query,
            search: None,
            sort: SortBy::default(),
            rows: Vec::new(),
            metadata: Metadata::first_page(query.limit),
            view: ViewState::Idle,
            write: WriteState::Idle,
            _resource: PhantomData,
        }
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn limit(&self) -> u32 {
        self.query.limit
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn write_state(&self) -> WriteState {
        self.write
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> SortBy {
        self.sort
    }

    /// every row of the current page, including ones hidden from the user
    pub fn rows(&self) -> &[Row<R::Record>] {
        &self.rows
    }

    pub fn row(&self, id: &Id) -> Option<&Row<R::Record>> {
        self.rows.iter().find(|row| R::id(&row.record) == id)
    }

    pub fn can_edit(&self, id: &Id) -> bool {
        self.row(id).map(|r| r.access.edit).unwrap_or(false)
    }

    pub fn can_delete(&self, id: &Id) -> bool {
        self.row(id).map(|r| r.access.delete).unwrap_or(false)
    }

    /// empty or blank text clears the search
    pub fn set_search<S>(&mut self, search: Option<S>)
    where
        S: AsRef<str>
    {
        self.search = search
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty());
    }

    pub fn set_sort(&mut self, sort: SortBy) {
        self.sort = sort;
    }

    /// takes effect on the next fetch, which starts over from page one
    pub fn set_limit(&mut self, limit: u32) {
        self.query = PageQuery::new(1, limit);
    }

    /// rows the user may see on the current page after search and sort
    pub fn visible(&self) -> Vec<&Row<R::Record>> {
        let mut rtn: Vec<&Row<R::Record>> = self.rows.iter()
            .filter(|row| row.access.view)
            .filter(|row| match &self.search {
                Some(needle) => R::search_text(&row.record).contains(needle.as_str()),
                None => true,
            })
            .collect();

        match self.sort {
            SortBy::Server => {}
            SortBy::Label => rtn.sort_by_cached_key(|row| R::label(&row.record).to_lowercase()),
            SortBy::Newest => rtn.sort_by(|a, b| newest_first(R::created(&a.record), R::created(&b.record))),
            SortBy::Oldest => rtn.sort_by(|a, b| newest_first(R::created(&b.record), R::created(&a.record))),
        }

        rtn
    }

    fn scope(&self) -> Option<Scope> {
        if self.session.is_authenticated() {
            Some(self.session.scope())
        } else {
            None
        }
    }

    fn access_for(&self, tag: Option<&str>) -> Access {
        match self.scope() {
            Some(scope) => scope.access(tag),
            None => Access::DENIED,
        }
    }

    pub async fn fetch(&mut self) -> Result<(), EditorError> {
        self.view = ViewState::Loading;

        let params = [
            ("page", self.query.page.to_string()),
            ("limit", self.query.limit.to_string()),
        ];

        match self.api.get_with::<Vec<R::Record>>(R::PATH, &params).await {
            Ok(payload) => {
                let (_, metadata, data) = payload.into_parts();
                let metadata = metadata.unwrap_or(Metadata {
                    total_items: data.len() as u64,
                    total_pages: self.query.page,
                    current_page: self.query.page,
                    limit: self.query.limit,
                }).normalized();

                let rows = data.into_iter()
                    .map(|record| {
                        let access = self.access_for(R::scope_tag(&record));

                        Row { record, access }
                    })
                    .collect();

                tracing::debug!(
                    "{} page {}/{} loaded",
                    R::NAME,
                    metadata.current_page,
                    metadata.total_pages
                );

                self.rows = rows;
                self.query.page = metadata.current_page;
                self.metadata = metadata;
                self.view = ViewState::Populated;

                Ok(())
            }
            Err(RequestError::Cancelled) => {
                self.view = ViewState::Idle;

                Err(RequestError::Cancelled.into())
            }
            Err(err) => {
                self.rows.clear();
                self.query.page = 1;
                self.metadata = Metadata::first_page(self.query.limit);
                self.view = ViewState::Error;

                Err(err.into())
            }
        }
    }

    pub async fn goto(&mut self, page: u32) -> Result<(), EditorError> {
        self.query.page = page.max(1);
        self.fetch().await
    }

    /// false when already on the last page
    pub async fn next_page(&mut self) -> Result<bool, EditorError> {
        if !self.metadata.has_next() {
            return Ok(false);
        }

        self.goto(self.query.page + 1).await?;

        Ok(true)
    }

    /// false when already on the first page
    pub async fn prev_page(&mut self) -> Result<bool, EditorError> {
        if !self.metadata.has_prev() {
            return Ok(false);
        }

        self.goto(self.query.page - 1).await?;

        Ok(true)
    }

    /// the access a draft would give, checking the level it names
    fn draft_access(&self, draft: &Draft) -> Access {
        match R::TAG_FIELD {
            Some(field) => self.access_for(draft.tag(field)),
            None => self.access_for(None),
        }
    }

    fn loaded_access(&self, id: &Id) -> Result<Access, EditorError> {
        self.row(id)
            .map(|row| row.access)
            .ok_or_else(|| EditorError::NotLoaded(R::NAME, id.clone()))
    }

    async fn refresh(&mut self) {
        if let Err(err) = self.fetch().await {
            tracing::warn!("failed to refresh {} after write: {}", R::NAME, err);
        }
    }

    /// refetches after any write the server accepted, whether or not it
    /// sent the record back
    async fn submit<F>(&mut self, send: F) -> Result<Option<R::Record>, EditorError>
    where
        F: Future<Output = Result<Payload<Option<R::Record>>, RequestError>>
    {
        self.write = WriteState::Submitting;
        let result = send.await;
        self.write = WriteState::Idle;

        let record = result?.into_data();

        self.refresh().await;

        Ok(record)
    }

    pub async fn create(&mut self, draft: Draft) -> Result<Option<R::Record>, EditorError> {
        if !self.draft_access(&draft).edit {
            return Err(EditorError::Forbidden(R::NAME));
        }

        let body = Body::from_parts(Value::Object(draft.fields), draft.file.as_ref()).await?;
        let api = self.api.clone();

        self.submit(async move { api.post::<R::Record>(R::PATH, body).await }).await
    }

    /// a draft naming a level moves the record there, so the new level has
    /// to be in scope too
    pub async fn update(&mut self, id: &Id, draft: Draft) -> Result<Option<R::Record>, EditorError> {
        if !self.loaded_access(id)?.edit {
            return Err(EditorError::Forbidden(R::NAME));
        }

        if let Some(field) = R::TAG_FIELD {
            if draft.fields.contains_key(field) && !self.draft_access(&draft).edit {
                return Err(EditorError::Forbidden(R::NAME));
            }
        }

        let body = Body::from_parts(Value::Object(draft.fields), draft.file.as_ref()).await?;
        let api = self.api.clone();
        let path = R::item_path(id);

        self.submit(async move { api.put::<R::Record>(&path, body).await }).await
    }

    pub async fn publish(&mut self, id: &Id, published: bool) -> Result<Option<R::Record>, EditorError> {
        let Some(field) = R::PUBLISH_FIELD else {
            return Err(EditorError::NotPublishable(R::NAME));
        };

        if !self.loaded_access(id)?.edit {
            return Err(EditorError::Forbidden(R::NAME));
        }

        let mut fields = Map::new();
        fields.insert(field.to_owned(), Value::Bool(published));

        let body = Body::Json(Value::Object(fields));
        let api = self.api.clone();
        let path = R::item_path(id);

        self.submit(async move { api.patch::<R::Record>(&path, body).await }).await
    }

    pub async fn delete(&mut self, id: &Id) -> Result<(), EditorError> {
        if !self.loaded_access(id)?.delete {
            return Err(EditorError::Forbidden(R::NAME));
        }

        self.write = WriteState::Submitting;
        let result = self.api.delete(&R::item_path(id), None).await;
        self.write = WriteState::Idle;

        result?;

        self.query.page = query::page_after_removal(self.query.page, self.rows.len());
        self.refresh().await;

        Ok(())
    }

    /// aborts whatever this editor has in flight. the editor is unusable
    /// for requests afterwards.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<R: Resource> Drop for ListEditor<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// records without a timestamp go last
fn newest_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timestamp_ordering() {
        let cases = [
            (Some(2), Some(1), Ordering::Less),
            (Some(1), Some(2), Ordering::Greater),
            (Some(1), None, Ordering::Less),
            (None, Some(1), Ordering::Greater),
            (None, None, Ordering::Equal),
        ];

        for (a, b, expected) in cases {
            assert_eq!(newest_first(a, b), expected, "newest_first({:?}, {:?})", a, b);
        }
    }

    #[test]
    fn draft_builder() {
        let draft = Draft::new()
            .with("title", "Upacara")
            .with("jenjang", "SD")
            .with("isPublished", false);

        assert_eq!(draft.tag("jenjang"), Some("SD"));
        assert_eq!(draft.tag("isPublished"), None);
        assert_eq!(draft.fields.len(), 3);
    }
}
