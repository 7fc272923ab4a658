use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use random_episode_finder::{
    AppState, Controller, DEFAULT_SELECTION_DELAY, FinderConfig, FormattedEpisode, Phase,
    SubmitOptions, TVMAZE_BASE_URL, TvMazeProvider, format_airdate, suggestions,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Finder = Controller<TvMazeProvider>;

/// Random Episode Finder - let chance pick the next episode to watch
#[derive(Parser)]
#[command(name = "random-episode-finder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the TVMaze API
    #[arg(long, global = true, default_value = TVMAZE_BASE_URL)]
    api_url: String,

    /// Pause before revealing a random episode, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_SELECTION_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// File to keep favorites in (defaults to the user data directory)
    #[arg(long, global = true)]
    favorites_file: Option<PathBuf>,

    /// Seed for reproducible random picks
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pick a random episode of a show
    #[command(alias = "f")]
    Find {
        /// Name of the show
        #[arg(required = true)]
        show: Vec<String>,

        /// First season to consider
        #[arg(long)]
        from: Option<u32>,

        /// Last season to consider
        #[arg(long)]
        to: Option<u32>,
    },

    /// List the seasons of a show with their episode counts
    Seasons {
        #[arg(required = true)]
        show: Vec<String>,
    },

    /// Pick a random show and a random episode of it
    Surprise,

    /// Suggest shows from the bundled catalog
    Suggest {
        #[arg(required = true)]
        term: Vec<String>,
    },

    /// Manage favorite shows
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Interactive menu (default)
    #[command(alias = "i")]
    Interactive,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite shows
    #[command(alias = "ls")]
    List,

    /// Look up a show and add it to the favorites
    Add {
        #[arg(required = true)]
        show: Vec<String>,
    },

    /// Remove a favorite by its TVMaze id
    #[command(alias = "rm")]
    Remove { id: u64 },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FinderConfig {
        api_base_url: cli.api_url,
        selection_delay: Duration::from_millis(cli.delay_ms),
        favorites_file: cli.favorites_file,
        seed: cli.seed,
    };
    let mut finder = Controller::from_config(&config);

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Find { show, from, to } => run_find(&mut finder, &show.join(" "), from, to),
        Command::Seasons { show } => run_seasons(&mut finder, &show.join(" ")),
        Command::Surprise => {
            println!("Picking a surprise...");
            print_outcome(finder.surprise_me());
        }
        Command::Suggest { term } => run_suggest(&term.join(" ")),
        Command::Favorites { action } => {
            run_favorites(&mut finder, action.unwrap_or(FavoritesAction::List))
        }
        Command::Interactive => run_interactive(&mut finder)?,
    }

    Ok(())
}

fn run_find(finder: &mut Finder, show: &str, from: Option<u32>, to: Option<u32>) {
    println!("Looking up '{}'...", show);
    if finder.submit_show_name(show, SubmitOptions::default()).phase != Phase::Ready {
        print_outcome(finder.state());
        return;
    }

    if let Some(from) = from {
        finder.set_min_season(from);
    }
    if let Some(to) = to {
        finder.set_max_season(to);
    }

    let range = finder.state().range;
    println!(
        "Drawing from seasons {} to {} of {}...",
        range.min, range.max, range.total
    );
    print_outcome(finder.request_random_episode());
}

fn run_seasons(finder: &mut Finder, show: &str) {
    let state = finder.submit_show_name(show, SubmitOptions::default());
    if state.phase != Phase::Ready {
        print_outcome(state);
        return;
    }

    print_seasons(state);
}

fn run_suggest(term: &str) {
    let matches = suggestions(term);
    if matches.is_empty() {
        println!("No suggestions for '{}'.", term);
        return;
    }

    for show in matches {
        println!("{}", show.name);
    }
}

fn run_favorites(finder: &mut Finder, action: FavoritesAction) {
    match action {
        FavoritesAction::List => print_favorites(finder),
        FavoritesAction::Add { show } => {
            let name = show.join(" ");
            match finder.lookup_show(&name) {
                Some(show) => {
                    println!("Added '{}' (id {}) to favorites.", show.name, show.id);
                    finder.add_favorite(show);
                }
                None => println!("Show not found."),
            }
        }
        FavoritesAction::Remove { id } => {
            if finder.remove_favorite(id) {
                println!("Removed show {} from favorites.", id);
            } else {
                println!("Show {} is not a favorite.", id);
            }
        }
    }
}

fn run_interactive(finder: &mut Finder) -> Result<()> {
    println!("=== Random Episode Finder ===\n");

    loop {
        let has_show = finder.state().show.is_some();
        let mut actions = vec![MenuAction::Search];
        if has_show {
            actions.push(MenuAction::FindEpisode);
            if finder.state().range.total > 1 {
                actions.push(MenuAction::SeasonRange);
            }
            actions.push(MenuAction::ToggleFavorite);
        }
        actions.extend([
            MenuAction::SurpriseMe,
            MenuAction::Favorites,
            MenuAction::Clear,
            MenuAction::Quit,
        ]);

        let labels: Vec<String> = actions
            .iter()
            .map(|action| action.label(&*finder))
            .collect();
        let choice = Select::new()
            .with_prompt(menu_title(finder.state()))
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            MenuAction::Search => interactive_search(finder)?,
            MenuAction::FindEpisode => print_outcome(finder.request_random_episode()),
            MenuAction::SeasonRange => interactive_season_range(finder)?,
            MenuAction::ToggleFavorite => {
                if let Some(now_favorite) = finder.toggle_favorite() {
                    let verb = if now_favorite { "Added to" } else { "Removed from" };
                    println!("{} favorites.\n", verb);
                }
            }
            MenuAction::SurpriseMe => print_outcome(finder.surprise_me()),
            MenuAction::Favorites => interactive_favorites(finder)?,
            MenuAction::Clear => {
                finder.set_search_term("");
                println!("Cleared.\n");
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MenuAction {
    Search,
    FindEpisode,
    SeasonRange,
    ToggleFavorite,
    SurpriseMe,
    Favorites,
    Clear,
    Quit,
}

impl MenuAction {
    fn label(self, finder: &Finder) -> String {
        match self {
            MenuAction::Search => "Search for a TV show".to_string(),
            MenuAction::FindEpisode => "Find random episode".to_string(),
            MenuAction::SeasonRange => {
                let range = finder.state().range;
                format!("Season range ({} to {})", range.min, range.max)
            }
            MenuAction::ToggleFavorite => {
                if finder.is_current_favorite() {
                    "Remove from favorites".to_string()
                } else {
                    "Add to favorites".to_string()
                }
            }
            MenuAction::SurpriseMe => "Surprise me!".to_string(),
            MenuAction::Favorites => format!("Favorites ({})", finder.favorites().len()),
            MenuAction::Clear => "Clear search".to_string(),
            MenuAction::Quit => "Quit".to_string(),
        }
    }
}

fn menu_title(state: &AppState) -> String {
    match &state.show {
        Some(show) => format!("{} ({} episodes)", show.name, state.episodes.len()),
        None => "What now?".to_string(),
    }
}

fn interactive_search(finder: &mut Finder) -> Result<()> {
    let term: String = Input::new()
        .with_prompt("Search for a TV show")
        .allow_empty(true)
        .interact_text()?;

    if finder.set_search_term(term.trim()).search_term.is_empty() {
        println!("Cleared.\n");
        return Ok(());
    }

    let mut names: Vec<String> = finder
        .suggestions()
        .iter()
        .map(|show| show.name.to_string())
        .collect();
    let typed = term.trim().to_string();
    if !names.iter().any(|name| name.eq_ignore_ascii_case(&typed)) {
        names.push(typed);
    }

    let choice = if names.len() == 1 {
        0
    } else {
        Select::new()
            .with_prompt("Did you mean")
            .items(&names)
            .default(0)
            .interact()?
    };

    println!("Looking up '{}'...", names[choice]);
    let state = finder.submit_show_name(&names[choice], SubmitOptions::default());
    if state.phase == Phase::Ready {
        print_seasons(state);
    } else {
        print_outcome(state);
    }

    Ok(())
}

fn interactive_season_range(finder: &mut Finder) -> Result<()> {
    let range = finder.state().range;

    let from: u32 = Input::new()
        .with_prompt(format!("From season (1-{})", range.total))
        .default(range.min)
        .interact_text()?;
    finder.set_min_season(from);

    let to: u32 = Input::new()
        .with_prompt(format!("To season (1-{})", range.total))
        .default(finder.state().range.max)
        .interact_text()?;
    let range = finder.set_max_season(to).range;

    println!("Season range is now {} to {}.\n", range.min, range.max);
    Ok(())
}

fn interactive_favorites(finder: &mut Finder) -> Result<()> {
    if finder.favorites().is_empty() {
        println!("Your favorite shows will appear here. Add one to get started!\n");
        return Ok(());
    }

    let mut labels: Vec<String> = finder
        .favorites()
        .iter()
        .map(|show| show.name.clone())
        .collect();
    labels.push("Back".to_string());

    let choice = Select::new()
        .with_prompt("Favorites")
        .items(&labels)
        .default(0)
        .interact()?;
    let Some(show) = finder.favorites().get(choice).cloned() else {
        return Ok(());
    };

    let action = Select::new()
        .with_prompt(&show.name)
        .items(&["Load", "Remove", "Back"])
        .default(0)
        .interact()?;

    match action {
        0 => {
            let state = finder.select_favorite(&show);
            if state.phase == Phase::Ready {
                print_seasons(state);
            } else {
                print_outcome(state);
            }
        }
        1 => {
            finder.remove_favorite(show.id);
            println!("Removed '{}' from favorites.\n", show.name);
        }
        _ => {}
    }

    Ok(())
}

fn print_favorites(finder: &Finder) {
    if finder.favorites().is_empty() {
        println!("No favorites yet.");
        return;
    }

    for show in finder.favorites() {
        println!("{:>8}  {}", show.id, show.name);
    }
}

fn print_seasons(state: &AppState) {
    if let Some(show) = &state.show {
        println!("\n=== {} ===", show.name);
    }
    for season in &state.seasons {
        println!("  Season {:>2}: {:>3} episode(s)", season.season, season.count);
    }
    println!();
}

/// Prints the result or error of the last action
fn print_outcome(state: &AppState) {
    if let Some(error) = &state.error {
        println!("{}\n", error);
        return;
    }

    if let Some(episode) = &state.result {
        print_episode(episode);
    }
}

fn print_episode(episode: &FormattedEpisode) {
    println!("\n=== {} \u{2022} {} ===", episode.show_name, episode.code());
    if let Some(airdate) = &episode.airdate {
        println!("Aired: {}", format_airdate(airdate));
    }
    println!("{}", episode.name);
    println!("\n{}\n", episode.summary);
    println!("Image: {}\n", episode.image);
}
