// Static page generation by token substitution into an HTML template.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::SiteConfig;
use crate::error::AppError;
use crate::movie::Catalog;

/// Replaced with the page heading.
pub const TITLE_TOKEN: &str = "__TEMPLATE_TITLE__";
/// Replaced with one `<li>` per movie.
pub const GRID_TOKEN: &str = "__TEMPLATE_MOVIE_GRID__";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The list items for every movie, in catalog order.
pub fn movie_grid(catalog: &Catalog) -> String {
    let mut html = String::new();
    for movie in catalog {
        let title = escape_html(&movie.title);
        html.push_str(&format!(
            r#"
            <li>
                <div class="movie-item">
                    <h2>{title}</h2>
                    <p>Year: {year}</p>
                    <p>Rating: {rating}</p>
                    <img src="{poster}" alt="{title} Poster" width="150">
                </div>
            </li>
            "#,
            year = movie.year,
            rating = movie.rating,
            poster = escape_html(&movie.poster),
        ));
    }
    html
}

/// Substitute both tokens into `template`.
pub fn render_page(template: &str, page_title: &str, catalog: &Catalog) -> String {
    template
        .replace(TITLE_TOKEN, &escape_html(page_title))
        .replace(GRID_TOKEN, &movie_grid(catalog))
}

/// Read the template, render the catalog and write the output page.
/// Returns the path that was written.
pub fn generate(site: &SiteConfig, catalog: &Catalog) -> Result<PathBuf, AppError> {
    let template = read_template(&site.template)?;
    let page = render_page(&template, &site.title, catalog);

    if let Some(dir) = site.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(AppError::Render)?;
    }
    std::fs::write(&site.output, page).map_err(AppError::Render)?;
    info!(output = %site.output.display(), movies = catalog.len(), "website generated");
    Ok(site.output.clone())
}

fn read_template(path: &Path) -> Result<String, AppError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::TemplateMissing(path.to_path_buf())),
        Err(e) => Err(AppError::Render(e)),
    }
}
