use kanri_core::enums::Surface;

use crate::cli::GlobalFlags;
use crate::commands::board::{BoardView, output_board};
use crate::context::AppContext;

pub async fn run(pages: u32, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = ctx.board_session();
    session.load().await?;
    for _ in 1..pages {
        let mut loaded = 0;
        for status in Surface::Board.statuses() {
            loaded += session.load_more(*status).await?;
        }
        if loaded == 0 {
            break;
        }
    }
    output_board(&BoardView::of(session.board()), flags)
}
