//! Handler for the `clv` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::ClvArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::calculate_clv;
use crate::error::Result;

/// Execute `clv <BET> <CLOSE>`. Pure computation, no config or database.
pub fn execute(args: &ClvArgs) -> Result<()> {
    let clv = calculate_clv(args.bet, args.close);

    if output::is_json() {
        output::json_output(json!({
            "command": "clv",
            "bet_price": args.bet,
            "closing_price": args.close,
            "clv_pct": clv,
        }));
        return Ok(());
    }

    output::field("Bet price", args.bet);
    output::field("Closing price", args.close);
    output::field("CLV", format!("{}%", output::signed(clv)));
    Ok(())
}
