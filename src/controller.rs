pub mod category;
pub mod game;
pub mod level;
pub mod player;
pub mod question;

use std::io;

use log::{info, warn};

use crate::console::{pause, Console};
use crate::error::StoreError;

/// Tell the player how a create/delete went. Failures stay on screen until
/// acknowledged; the menu walk carries on either way.
fn report(
    console: &mut dyn Console,
    action: &str,
    result: Result<String, StoreError>,
) -> io::Result<()> {
    match result {
        Ok(done) => {
            info!("{action}: {done}");
            Ok(())
        }
        Err(e) => {
            warn!("{action} failed: {e}");
            console.say(&format!("\nCould not {action}: {e}\n"))?;
            pause(console)
        }
    }
}
