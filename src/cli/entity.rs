use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use serde_json::{Map, Value};

use sekolah_api::Id;
use sekolah_api::client::body::FileUpload;
use sekolah_api::client::editor::{Draft, EditorError, ListEditor, Row, SortBy};
use sekolah_api::resources::Resource;

use crate::error::{self, Context};
use crate::formatting::{datetime_to_string, truncate, Column, DateFormat, Float, TextTable, PRETTY_OPTIONS};
use crate::input;
use crate::state::AppState;

const LABEL_CHARS: usize = 48;

#[derive(Debug, Args)]
pub struct EntityArgs {
    #[command(subcommand)]
    command: EntityCmds
}

#[derive(Debug, Subcommand)]
enum EntityCmds {
    /// lists one page of records
    List(ListArgs),

    /// creates a new record
    Create(CreateArgs),

    /// updates a record on the given page
    Update(UpdateArgs),

    /// publishes or unpublishes a record on the given page
    Publish(PublishArgs),

    /// deletes a record on the given page
    Delete(DeleteArgs),
}

pub async fn handle<R: Resource>(state: &AppState, args: EntityArgs) -> error::Result {
    let mut editor = ListEditor::<R>::new(state.session.clone(), state.settings.page_limit);

    match args.command {
        EntityCmds::List(given) => list(&mut editor, given).await,
        EntityCmds::Create(given) => create(&mut editor, given).await,
        EntityCmds::Update(given) => update(&mut editor, given).await,
        EntityCmds::Publish(given) => publish(&mut editor, given).await,
        EntityCmds::Delete(given) => delete(&mut editor, given).await,
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SortArg {
    #[default]
    Server,
    Title,
    Newest,
    Oldest,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Server => SortBy::Server,
            SortArg::Title => SortBy::Label,
            SortArg::Newest => SortBy::Newest,
            SortArg::Oldest => SortBy::Oldest,
        }
    }
}

#[derive(Debug, Args)]
struct PageArgs {
    /// page to load
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// records per page, defaults to the configured page limit
    #[arg(long)]
    limit: Option<u32>,
}

impl PageArgs {
    async fn load<R: Resource>(&self, editor: &mut ListEditor<R>) -> error::Result {
        if let Some(limit) = self.limit {
            editor.set_limit(limit);
        }

        editor.goto(self.page).await?;

        Ok(())
    }
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    page: PageArgs,

    /// only shows records containing the given text
    #[arg(short, long)]
    search: Option<String>,

    /// order of records within the page
    #[arg(long, value_enum, default_value_t)]
    sort: SortArg,

    /// specifies the format for the timestamp output
    #[arg(long, default_value_t)]
    ts_format: DateFormat,
}

fn published_text(published: Option<bool>) -> &'static str {
    match published {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn access_text<T>(row: &Row<T>) -> &'static str {
    if row.access.edit {
        ""
    } else {
        "read-only"
    }
}

async fn list<R: Resource>(editor: &mut ListEditor<R>, args: ListArgs) -> error::Result {
    args.page.load(editor).await?;

    editor.set_search(args.search);
    editor.set_sort(args.sort.into());

    let mut table = TextTable::with_columns([
        Column::builder("id").float(Float::Right).build(),
        Column::builder("title").build(),
        Column::builder("level").build(),
        Column::builder("published").build(),
        Column::builder("created").build(),
        Column::builder("access").build(),
    ]);

    for row in editor.visible() {
        let record = &row.record;
        let mut text = table.add_row();
        text.set_col(0, R::id(record));
        text.set_col(1, truncate(R::label(record), LABEL_CHARS));
        text.set_col(2, R::scope_tag(record).unwrap_or(""));
        text.set_col(3, published_text(R::published(record)));

        if let Some(created) = R::created(record) {
            text.set_col(4, datetime_to_string(&created, &args.ts_format));
        }

        text.set_col(5, access_text(row));
        text.finish();
    }

    if table.is_empty() {
        println!("no contents");
    } else {
        table.print(&PRETTY_OPTIONS)
            .context("failed to output results to stdout")?;
    }

    let metadata = editor.metadata();

    println!(
        "page {} of {}, {} {} total",
        metadata.current_page,
        metadata.total_pages.max(1),
        metadata.total_items,
        R::NAME
    );

    Ok(())
}

/// splits `key=value`, the value is read as json when it parses and as a
/// plain string otherwise
fn parse_field(given: &str) -> Result<(String, Value), String> {
    let Some((key, value)) = given.split_once('=') else {
        return Err(format!("expected key=value, got \"{given}\""));
    };

    let key = key.trim();

    if key.is_empty() {
        return Err("field name is empty".into());
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| Value::String(value.to_owned()));

    Ok((key.to_owned(), value))
}

#[derive(Debug, Args)]
struct DraftArgs {
    /// a field to send as key=value, can be repeated
    ///
    /// values that parse as json are sent as json, e.g. isPublished=true
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// a file to upload with the record
    #[arg(long)]
    file: Option<PathBuf>,

    /// form field the file is sent under
    #[arg(long, default_value = "image")]
    file_field: String,
}

impl DraftArgs {
    fn into_draft(self) -> Draft {
        let fields: Map<String, Value> = self.fields.into_iter().collect();
        let draft = Draft::from_fields(fields);

        match self.file {
            Some(path) => draft.with_file(FileUpload::new(self.file_field, path)),
            None => draft,
        }
    }
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    draft: DraftArgs,
}

async fn create<R: Resource>(editor: &mut ListEditor<R>, args: CreateArgs) -> error::Result {
    match editor.create(args.draft.into_draft()).await? {
        Some(record) => println!("created {} {}", R::NAME, R::id(&record)),
        None => println!("created {}", R::NAME),
    }

    Ok(())
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// id of the record
    #[arg(long)]
    id: Id,

    #[command(flatten)]
    page: PageArgs,

    #[command(flatten)]
    draft: DraftArgs,
}

fn not_on_page(err: EditorError, page: u32) -> error::Error {
    match err {
        EditorError::NotLoaded(..) => error::Error::new()
            .context(format!("{err}, use --page to pick the page it is on (tried {page})")),
        err => err.into(),
    }
}

async fn update<R: Resource>(editor: &mut ListEditor<R>, args: UpdateArgs) -> error::Result {
    args.page.load(editor).await?;

    editor.update(&args.id, args.draft.into_draft()).await
        .map_err(|e| not_on_page(e, args.page.page))?;

    println!("updated {} {}", R::NAME, args.id);

    Ok(())
}

#[derive(Debug, Args)]
struct PublishArgs {
    /// id of the record
    #[arg(long)]
    id: Id,

    /// hides the record instead
    #[arg(long)]
    unpublish: bool,

    #[command(flatten)]
    page: PageArgs,
}

async fn publish<R: Resource>(editor: &mut ListEditor<R>, args: PublishArgs) -> error::Result {
    args.page.load(editor).await?;

    editor.publish(&args.id, !args.unpublish).await
        .map_err(|e| not_on_page(e, args.page.page))?;

    Ok(())
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// id of the record
    #[arg(long)]
    id: Id,

    /// skips the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    #[command(flatten)]
    page: PageArgs,
}

async fn delete<R: Resource>(editor: &mut ListEditor<R>, args: DeleteArgs) -> error::Result {
    args.page.load(editor).await?;

    if let Some(row) = editor.row(&args.id) {
        if !args.yes && !input::read_yn(format!("delete {} \"{}\"?", R::NAME, R::label(&row.record)))? {
            return Ok(());
        }
    }

    editor.delete(&args.id).await
        .map_err(|e| not_on_page(e, args.page.page))?;

    Ok(())
}
