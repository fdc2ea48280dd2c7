use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use todo_core::{
    AuthFlow, ClientConfig, FileSessionStore, MemorySessionStore, Outcome, ReqwestTransport,
    Route, SessionStore, TodoClient, TodoItem, TodoSyncController,
};

mod console;
mod view;

use console::{ConsoleNotifier, LineReader, PromptConfirm};
use view::{ListCommand, LoginCommand, LIST_HELP, LOGIN_HELP};

type Auth = AuthFlow<ReqwestTransport, ConsoleNotifier, Box<dyn SessionStore>>;
type Controller = TodoSyncController<ReqwestTransport, ConsoleNotifier, PromptConfirm>;

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Terminal client for the todo API")]
struct Args {
    /// Config file (default: ~/.config/todo/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API root URL; overrides the config file and TODO_API_URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Persist the session token in this file
    #[arg(long, value_name = "FILE")]
    session_file: Option<PathBuf>,
}

fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("todo").join("config.toml"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the rendered list.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = ClientConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?
        .with_base_url_override(ClientConfig::env_base_url())
        .with_base_url_override(args.base_url);

    let session: Box<dyn SessionStore> = match args.session_file.or(config.session_file.clone()) {
        Some(path) => Box::new(FileSessionStore::new(path)),
        None => Box::new(MemorySessionStore::new()),
    };

    tracing::info!(base_url = %config.base_url, "Starting todo client");

    let client = TodoClient::new(&config.base_url);
    let transport = ReqwestTransport::new();
    let reader = LineReader::stdin();

    let auth: Auth = AuthFlow::new(client.clone(), transport.clone(), ConsoleNotifier, session);
    let mut controller: Controller = TodoSyncController::new(
        client,
        transport,
        ConsoleNotifier,
        PromptConfirm::new(reader.clone()),
    );

    let mut route = auth.resolve(Route::Todos);
    loop {
        let next = match route {
            Route::Login => login_view(&auth, &reader).await?,
            Route::Todos => list_view(&auth, &mut controller, &reader).await?,
        };
        match next {
            Some(r) => route = auth.resolve(r),
            None => break,
        }
    }

    Ok(())
}

/// Returns the next route, or `None` to exit.
async fn login_view(auth: &Auth, reader: &LineReader) -> Result<Option<Route>> {
    println!("Login ({LOGIN_HELP})");
    loop {
        let Some(line) = reader.read("login> ").await? else {
            return Ok(None);
        };
        match LoginCommand::parse(&line) {
            LoginCommand::Login => {
                let Some(email) = reader.read("email: ").await? else {
                    return Ok(None);
                };
                let Some(password) = reader.read("password: ").await? else {
                    return Ok(None);
                };
                if auth.login(email.trim(), &password).await == Route::Todos {
                    return Ok(Some(Route::Todos));
                }
            }
            LoginCommand::Help => println!("{LOGIN_HELP}"),
            LoginCommand::Quit => return Ok(None),
            LoginCommand::Empty => {}
            LoginCommand::Invalid(cmd) => println!("unknown command '{cmd}' ({LOGIN_HELP})"),
        }
    }
}

async fn list_view(auth: &Auth, controller: &mut Controller, reader: &LineReader) -> Result<Option<Route>> {
    println!("Todos ({LIST_HELP})");
    controller.start().await;
    render(controller);

    loop {
        let prompt = match controller.editing() {
            Some(_) => format!("edit [{}]> ", controller.draft_title()),
            None => "todo> ".to_string(),
        };
        let Some(line) = reader.read(&prompt).await? else {
            return Ok(None);
        };

        let outcome = match ListCommand::parse(&line) {
            ListCommand::List => controller.refresh().await,
            ListCommand::Add(title) => {
                if controller.editing().is_some() {
                    println!("finish the current edit with 'save' or 'cancel' first");
                    continue;
                }
                controller.set_draft(&title);
                controller.submit().await
            }
            ListCommand::Edit(n) => {
                match item_at(controller, n) {
                    Some(item) => controller.begin_edit(&item),
                    None => println!("no todo at position {n}"),
                }
                continue;
            }
            ListCommand::Title(text) => {
                controller.set_draft(&text);
                continue;
            }
            ListCommand::Save => controller.submit().await,
            ListCommand::Cancel => {
                controller.cancel_edit();
                continue;
            }
            ListCommand::Toggle(n) => match item_at(controller, n) {
                Some(item) => controller.toggle_completed(item.id).await,
                None => {
                    println!("no todo at position {n}");
                    continue;
                }
            },
            ListCommand::Remove(n) => match item_at(controller, n) {
                Some(item) => controller.remove(item.id).await,
                None => {
                    println!("no todo at position {n}");
                    continue;
                }
            },
            ListCommand::Logout => {
                controller.cancel_edit();
                return Ok(Some(auth.logout()));
            }
            ListCommand::Help => {
                println!("{LIST_HELP}");
                continue;
            }
            ListCommand::Quit => return Ok(None),
            ListCommand::Empty => continue,
            ListCommand::Invalid(cmd) => {
                println!("unknown command '{cmd}' ({LIST_HELP})");
                continue;
            }
        };

        tracing::debug!(?outcome, "Command finished");
        if outcome != Outcome::Rejected {
            render(controller);
        }
    }
}

fn item_at(controller: &Controller, position: usize) -> Option<TodoItem> {
    let displayed = controller.displayed();
    view::pick(&displayed, position).cloned()
}

fn render(controller: &Controller) {
    println!(
        "{}",
        view::render_list(&controller.displayed(), controller.editing(), controller.is_loading())
    );
}
