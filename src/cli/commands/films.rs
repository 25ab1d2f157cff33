//! List films command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_films(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(user) = store.get_user_by_username(username).await? else {
        println!("No user named '{username}'.");
        return Ok(());
    };

    let films = store.list_user_films(user.id).await?;

    if films.is_empty() {
        println!("{} has no films in their list.", user.username);
        return Ok(());
    }

    println!("Films for {} ({} total)", user.username, films.len());
    println!("{:-<50}", "");

    for film in films {
        println!("{:>4}. {}", film.order, film.name);
    }

    let catalog = store.film_count().await?;
    println!();
    println!("Catalog size: {catalog} films");

    Ok(())
}
