// UI layer: the numbered menu and the prompts, using `dialoguer`.
// Each handler collects input, calls one `MovieApp` operation and prints
// the outcome. Errors are printed and the loop carries on; only "0"
// ends the session.

use crate::app::MovieApp;
use crate::error::AppError;
use crate::movie::{Movie, MAX_RATING, MIN_RATING};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const MENU: &str = "
Menu:
1. View Movie List
2. Add a new movie
3. Remove a movie
4. Update rating of a movie
5. View movie statistics
6. Generate HTML page with movies
0. Exit";

/// One entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    GenerateSite,
}

impl Command {
    /// Map the text typed at the menu prompt to a command.
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "0" => Some(Command::Exit),
            "1" => Some(Command::List),
            "2" => Some(Command::Add),
            "3" => Some(Command::Delete),
            "4" => Some(Command::Update),
            "5" => Some(Command::Stats),
            "6" => Some(Command::GenerateSite),
            _ => None,
        }
    }
}

/// Main interactive menu. Runs until the user picks "0".
pub fn main_menu(app: MovieApp) -> Result<()> {
    loop {
        println!("{MENU}");
        let choice: String = Input::new()
            .with_prompt("Select an option")
            .allow_empty(true)
            .interact_text()?;

        let Some(command) = Command::parse(&choice) else {
            print_error("Please enter a valid number between 0 and 6.");
            continue;
        };

        let outcome = match command {
            Command::Exit => {
                println!("Bye");
                return Ok(());
            }
            Command::List => handle_list(&app),
            Command::Add => handle_add(&app),
            Command::Delete => handle_delete(&app),
            Command::Update => handle_update(&app),
            Command::Stats => handle_stats(&app),
            Command::GenerateSite => handle_generate(&app),
        };

        // Prompt failures (closed stdin) end the session; everything the
        // catalog reports is printed and the menu comes back.
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => print_error(&e.to_string()),
            Err(e) => return Err(e),
        }
    }
}

/// Outer error: terminal I/O. Inner error: the catalog operation.
type Handled = Result<std::result::Result<(), AppError>>;

fn handle_list(app: &MovieApp) -> Handled {
    let movies = match app.list_movies() {
        Ok(movies) => movies,
        Err(e) => return Ok(Err(e)),
    };
    if movies.is_empty() {
        println!("No movies available in the database.");
    } else {
        println!("\nMovies in the database:");
        for movie in &movies {
            println!("{movie}");
        }
    }
    Ok(Ok(()))
}

fn handle_add(app: &MovieApp) -> Handled {
    let Some(title) = prompt_title("Enter the movie title")? else {
        return Ok(Ok(()));
    };

    if app.has_lookup() {
        let spinner = spinner(format!("Looking up '{title}'..."));
        let fetched = app.add_from_lookup(&title);
        spinner.finish_and_clear();
        match fetched {
            Ok(movie) => {
                println!("The movie '{}' has been added successfully!", movie.title);
                return Ok(Ok(()));
            }
            Err(e @ AppError::Lookup(_)) => {
                print_error(&e.to_string());
                let manual = Confirm::new()
                    .with_prompt("Enter the details by hand instead?")
                    .default(false)
                    .interact()?;
                if !manual {
                    return Ok(Ok(()));
                }
            }
            Err(e) => return Ok(Err(e)),
        }
    }

    let year = prompt_year()?;
    let rating = prompt_rating()?;
    let poster: String = Input::new()
        .with_prompt("Enter the poster URL or path")
        .allow_empty(true)
        .interact_text()?;

    let movie = Movie::new(title, year, rating, poster.trim());
    let title = movie.title.clone();
    Ok(app.add_movie(movie).map(|()| {
        println!("The movie '{title}' has been added successfully!");
    }))
}

fn handle_delete(app: &MovieApp) -> Handled {
    let Some(title) = prompt_title("Enter the title of the movie to delete")? else {
        return Ok(Ok(()));
    };
    Ok(app.delete_movie(&title).map(|movie| {
        println!("Movie '{}' has been successfully removed.", movie.title);
    }))
}

fn handle_update(app: &MovieApp) -> Handled {
    let Some(title) = prompt_title("Enter the title of the movie to update")? else {
        return Ok(Ok(()));
    };
    let rating = prompt_rating()?;
    Ok(app.update_rating(&title, rating).map(|()| {
        println!("The rating for '{title}' has been updated to {rating}.");
    }))
}

fn handle_stats(app: &MovieApp) -> Handled {
    let stats = match app.statistics() {
        Ok(Some(stats)) => stats,
        Ok(None) => {
            println!("No movies available to calculate statistics.");
            return Ok(Ok(()));
        }
        Err(e) => return Ok(Err(e)),
    };
    println!("\nMovie Statistics:");
    println!("Movies: {}", stats.count);
    println!("Average Rating: {:.2}", stats.average);
    println!("Median Rating: {:.2}", stats.median);
    println!("Best Movie: {} - Rating: {}", stats.best.title, stats.best.rating);
    println!("Worst Movie: {} - Rating: {}", stats.worst.title, stats.worst.rating);
    Ok(Ok(()))
}

fn handle_generate(app: &MovieApp) -> Handled {
    Ok(app.generate_site().map(|written| match written {
        Some(path) => println!("Website generated successfully at: {}", path.display()),
        None => println!("No movies to generate the website."),
    }))
}

/// Ask for a title. A blank answer prints an error and yields `None`.
fn prompt_title(prompt: &str) -> Result<Option<String>> {
    let title: String = Input::new().with_prompt(prompt).allow_empty(true).interact_text()?;
    let title = title.trim();
    if title.is_empty() {
        print_error("Movie title cannot be empty.");
        return Ok(None);
    }
    Ok(Some(title.to_string()))
}

/// Re-prompts until the answer parses as an integer.
fn prompt_year() -> Result<i32> {
    let year = Input::<i32>::new().with_prompt("Enter the release year").interact_text()?;
    Ok(year)
}

/// Re-prompts until the answer is a number in the rating range.
fn prompt_rating() -> Result<f64> {
    let rating = Input::<f64>::new()
        .with_prompt("Enter the movie rating (0-10)")
        .validate_with(|r: &f64| -> std::result::Result<(), &str> {
            if r.is_finite() && (MIN_RATING..=MAX_RATING).contains(r) {
                Ok(())
            } else {
                Err("Rating must be between 0 and 10.")
            }
        })
        .interact_text()?;
    Ok(rating)
}

/// A ticking spinner shown while we wait on the network.
fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_error(message: &str) {
    println!("{} {}", "Error:".red().bold(), message);
}
