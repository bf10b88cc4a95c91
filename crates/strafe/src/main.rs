use std::process::ExitCode;

use strafe::prelude::*;

fn main() -> ExitCode {
    env_logger::init();

    let mut game = Game::new("2D Shooter Prototype").size(800, 600);
    if let Some(dir) = std::env::args().nth(1) {
        game = game.asset_dir(dir);
    }

    match game.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
