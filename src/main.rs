// repodeck: terminal dashboard for managing GitHub repositories.

mod app;
mod auth;
mod error;
mod github;
mod query;
mod state;
mod ui;

use app::App;
use auth::TokenStore;
use error::DeckError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = TokenStore::from_project_dirs()
        .ok_or_else(|| DeckError::Other("could not determine config directory".to_string()))?;

    let mut terminal = ratatui::init();
    let result = App::new(store).run(&mut terminal).await;
    ratatui::restore();

    result.map_err(Into::into)
}
