use anyhow::Result;
use console::style;

use crate::{
    candy_machine::get_candy_machine_state,
    common::*,
    config::load_config,
    mint::check_candy_machine,
    rpc::ChainRpc,
    utils::*,
    view::*,
};

pub struct ShowArgs {
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub config: String,
}

pub fn process_show(args: ShowArgs) -> Result<()> {
    println!(
        "{} {}Looking up candy machine",
        style("[1/1]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let pb = spinner_with_style();
    pb.set_message("Connecting...");

    let config = load_config(&args.config)?;
    let context = mint_setup(args.keypair, args.rpc_url, &config)?;
    let payer = context.keypair.pubkey();

    let state = get_candy_machine_state(
        &context.rpc,
        &config.program_id,
        &config.candy_machine_id,
        &payer,
        config.payment_token_mint.as_ref(),
    )?;
    let balance = context.rpc.fetch_balance(&payer)?;

    pb.finish_and_clear();

    println!(
        "\n{}{} {}",
        CANDY_EMOJI,
        style("Candy machine ID:").dim(),
        &state.id
    );

    println!(" {}", style(":").dim());
    print_with_style("", "rpc url", context.rpc_url.clone());
    print_with_style("", "program", state.program_id.to_string());
    print_with_style("", "authority", state.authority.to_string());
    print_with_style("", "wallet", state.wallet.to_string());
    print_with_style("", "config", state.config.to_string());

    if let Some(token_mint) = state.token_mint {
        print_with_style("", "token mint", token_mint.to_string());
    }

    print_with_style(
        "",
        "price",
        match state.token_mint {
            Some(_) => state.price.to_string(),
            None => format!("◎{} ({})", lamports_to_sol(state.price), state.price),
        },
    );
    print_with_style("", "items available", state.items_available.to_string());
    print_with_style("", "items redeemed", state.items_redeemed.to_string());
    print_with_style("", "items remaining", state.items_remaining.to_string());

    print_with_style(
        "",
        "go live date",
        format_go_live(state.go_live(config.start_date)),
    );

    println!(
        "\n{}{} {}",
        COMPUTER_EMOJI,
        style("Wallet:").dim(),
        shorten_address(&payer.to_string(), 4)
    );
    println!(" {}", style(":").dim());
    print_with_style("", "balance", format!("◎{}", lamports_to_sol(balance)));

    if let Some(payment) = &state.payment_token {
        print_with_style("", "payment account", payment.account.to_string());
        print_with_style(
            "",
            "payment balance",
            if payment.exists {
                payment.amount.to_string()
            } else {
                "none".to_string()
            },
        );
    }

    let action = MintAction::evaluate(&state, current_timestamp(), config.start_date, false);
    print_with_style(
        "",
        "mint",
        action
            .label()
            .unwrap_or_else(|| CLAIMED_ALL_MESSAGE.to_string()),
    );

    if let Err(err) = check_candy_machine(&state, &config) {
        println!("\n{}{}", WARNING_EMOJI, style(err).yellow());
    }

    Ok(())
}

fn print_with_style(indent: &str, key: &str, value: String) {
    println!(
        " {} {}",
        style(format!("{}:.. {}:", indent, key)).dim(),
        value
    );
}
