use crate::app::App;
use anyhow::{Result, anyhow};
use showcase_core::navigation::Route;

pub fn navigate(app: &App, path: &str) -> Result<()> {
    let route = Route::parse(path).ok_or_else(|| anyhow!("Unknown route: {path}"))?;

    if app.router.try_navigate(route.clone()) {
        println!("Entered {route}");
    } else {
        println!("Access to {route} denied; now at {}", app.router.current());
    }
    Ok(())
}
