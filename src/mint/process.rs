use std::{sync::Arc, time::Duration};

use anchor_client::solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use anyhow::{anyhow, Result};
use console::style;
use tracing::{error, info, warn};

use crate::{
    candy_machine::{get_candy_machine_state, CandyMachineState},
    config::{load_config, MintConfig, PollConfig},
    constants::*,
    mint::{
        errors::{MintError, MintErrorKind},
        instructions::{build_mint_instructions, MintRequest},
        poll::poll_signature_status,
        session::MintSession,
    },
    rpc::{ChainRpc, SignatureOutcome},
    setup::mint_setup,
    utils::*,
    view::*,
};

pub struct MintArgs {
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub config: String,
    pub wait: bool,
    pub number: Option<u64>,
    pub interrupt: Arc<Interrupt>,
}

/// A mint transaction the cluster has a status for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub signature: Signature,
    pub nft_mint: Pubkey,
    pub status: SignatureOutcome,
}

impl MintOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Refuses to mint into a candy machine that does not match the configuration.
pub fn check_candy_machine(
    state: &CandyMachineState,
    config: &MintConfig,
) -> Result<(), MintError> {
    if state.wallet != config.treasury {
        return Err(MintError::TreasuryMismatch {
            on_chain: state.wallet,
            configured: config.treasury,
        });
    }

    if state.config != config.config {
        return Err(MintError::ConfigMismatch {
            on_chain: state.config,
            configured: config.config,
        });
    }

    Ok(())
}

pub fn mint_request(config: &MintConfig, payer: &Pubkey) -> MintRequest {
    MintRequest {
        program_id: config.program_id,
        candy_machine: config.candy_machine_id,
        config: config.config,
        payer: *payer,
        treasury: config.treasury,
        payment_mint: config.payment_token_mint,
    }
}

/// Builds, signs and submits one mint transaction, then polls until the
/// cluster reports its status.
///
/// A rejected transaction is still an `Ok` outcome; inspect
/// [`MintOutcome::status`] for the program error.
pub async fn mint_one<R: ChainRpc + ?Sized>(
    rpc: &R,
    session: &MintSession,
    request: &MintRequest,
    payer: &Keypair,
    poll: &PollConfig,
    interrupt: &Interrupt,
) -> Result<MintOutcome, MintError> {
    let mut attempt = session.begin()?;

    let nft_mint = Keypair::new();
    let mint_rent = rpc.rent_exemption(MINT_LAYOUT as usize)?;
    let instructions = build_mint_instructions(request, &nft_mint.pubkey(), mint_rent)?;

    let recent_blockhash = rpc.latest_blockhash()?;
    let transaction = Transaction::new_signed_with_payer(
        &instructions,
        Some(&payer.pubkey()),
        &[payer, &nft_mint],
        recent_blockhash,
    );

    let signature = rpc.submit_transaction(&transaction)?;
    attempt.submitted()?;
    info!(
        "Submitted mint transaction {} for mint {}",
        signature,
        nft_mint.pubkey()
    );

    attempt.polling()?;
    let status = poll_signature_status(rpc, &signature, poll, interrupt).await?;

    if status.is_success() {
        attempt.confirm()?;
        info!("Minted {} in slot {}", nft_mint.pubkey(), status.slot);
    } else {
        warn!("Mint transaction {} rejected: {:?}", signature, status.err);
        attempt.fail();
    }

    Ok(MintOutcome {
        signature,
        nft_mint: nft_mint.pubkey(),
        status,
    })
}

/// Runs one attempt and turns its result into the alert shown to the user.
pub async fn mint_with_alert<R: ChainRpc + ?Sized>(
    rpc: &R,
    session: &MintSession,
    request: &MintRequest,
    payer: &Keypair,
    poll: &PollConfig,
    interrupt: &Interrupt,
) -> (AlertState, Option<MintOutcome>) {
    match mint_one(rpc, session, request, payer, poll, interrupt).await {
        Ok(outcome) => (AlertState::from_status(&outcome.status), Some(outcome)),
        Err(err) => {
            error!("Mint attempt failed: {:?}", err);
            (AlertState::from_error(&err), None)
        }
    }
}

fn load_state<R: ChainRpc + ?Sized>(
    rpc: &R,
    config: &MintConfig,
    payer: &Pubkey,
) -> Result<CandyMachineState> {
    get_candy_machine_state(
        rpc,
        &config.program_id,
        &config.candy_machine_id,
        payer,
        config.payment_token_mint.as_ref(),
    )
}

fn print_alert(alert: &AlertState) {
    let message = match alert.severity {
        Severity::Success => style(&alert.message).green().bold(),
        Severity::Info => style(&alert.message).cyan(),
        Severity::Warning => style(&alert.message).yellow(),
        Severity::Error => style(&alert.message).red().bold(),
    };
    println!("{}", message);
}

/// Waits out the go-live countdown. Returns `false` when interrupted.
async fn wait_for_go_live(go_live: i64, interrupt: &Interrupt) -> bool {
    let pb = spinner_with_style();

    loop {
        let remaining = go_live - current_timestamp();
        if remaining <= 0 {
            pb.finish_and_clear();
            return true;
        }
        pb.set_message(format!(
            "{}Mint opens in {}",
            HOURGLASS_EMOJI,
            format_countdown(remaining)
        ));

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = interrupt.triggered() => {
                pb.abandon_with_message(format!("{}", style("Wait cancelled").red()));
                return false;
            }
        }
    }
}

fn print_progress(state: &CandyMachineState, balance: u64) {
    println!(
        "{}{} {}/{}  {} {} SOL",
        PAPER_EMOJI,
        style("Minted:").dim(),
        state.items_redeemed,
        state.items_available,
        style("Balance:").dim(),
        lamports_to_sol(balance)
    );
}

/// Why a mint run stopped before minting everything requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintStop {
    SoldOut,
    ClaimedAll,
    NotLive { seconds: i64 },
    Cancelled,
    Failed(AlertState),
}

impl MintStop {
    pub fn message(&self) -> String {
        match self {
            MintStop::SoldOut => MintErrorKind::SoldOut.message().to_string(),
            MintStop::ClaimedAll => CLAIMED_ALL_MESSAGE.to_string(),
            MintStop::NotLive { seconds } => format!(
                "{} Opens in {}, re-run with --wait to wait for it.",
                MintErrorKind::NotLiveYet.message(),
                format_countdown(*seconds)
            ),
            MintStop::Cancelled => "Minting cancelled before go-live".to_string(),
            MintStop::Failed(alert) => alert.message.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MintRun {
    pub requested: u64,
    /// Confirmed mints, in order.
    pub outcomes: Vec<MintOutcome>,
    /// State as last read from the cluster.
    pub state: CandyMachineState,
    /// Payer balance after the last attempt, `None` if nothing was attempted.
    pub balance: Option<u64>,
    pub stop: Option<MintStop>,
}

impl MintRun {
    pub fn minted(&self) -> u64 {
        self.outcomes.len() as u64
    }
}

/// Mints up to `number` NFTs one after the other through a single session.
///
/// Stops at the first sold-out, claimed-all, not-live or failed attempt. The
/// candy machine and the payer balance are re-read after every attempt.
pub async fn run_mints<R: ChainRpc + ?Sized>(
    rpc: &R,
    config: &MintConfig,
    payer: &Keypair,
    mut state: CandyMachineState,
    number: u64,
    wait: bool,
    interrupt: &Interrupt,
) -> Result<MintRun> {
    let session = MintSession::new();
    let request = mint_request(config, &payer.pubkey());
    let mut outcomes = Vec::new();
    let mut balance = None;
    let mut stop = None;

    while (outcomes.len() as u64) < number {
        match MintAction::evaluate(&state, current_timestamp(), config.start_date, false) {
            MintAction::SoldOut => {
                stop = Some(MintStop::SoldOut);
                break;
            }
            MintAction::ClaimedAll => {
                stop = Some(MintStop::ClaimedAll);
                break;
            }
            MintAction::Countdown(seconds) => {
                if !wait {
                    stop = Some(MintStop::NotLive { seconds });
                    break;
                }
                if !wait_for_go_live(current_timestamp() + seconds, interrupt).await {
                    stop = Some(MintStop::Cancelled);
                    break;
                }
                state = load_state(rpc, config, &payer.pubkey())?;
                continue;
            }
            MintAction::Minting | MintAction::Ready => {}
        }

        print_alert(&AlertState::minting());

        let pb = spinner_with_style();
        pb.set_message(format!("Minting NFT {}/{}...", outcomes.len() + 1, number));

        let (alert, outcome) = mint_with_alert(
            rpc,
            &session,
            &request,
            payer,
            &config.poll,
            interrupt,
        )
        .await;

        pb.finish_and_clear();
        print_alert(&alert);

        state = load_state(rpc, config, &payer.pubkey())?;
        let lamports = rpc.fetch_balance(&payer.pubkey())?;
        balance = Some(lamports);

        match outcome {
            Some(outcome) if outcome.is_success() => {
                println!(
                    "{}{} {}",
                    COMPLETE_EMOJI,
                    style("Mint:").dim(),
                    outcome.nft_mint
                );
                println!(
                    "{}{} {}",
                    PAPER_EMOJI,
                    style("Signature:").dim(),
                    outcome.signature
                );
                outcomes.push(outcome);
            }
            _ => stop = Some(MintStop::Failed(alert)),
        }

        print_progress(&state, lamports);

        if stop.is_some() {
            break;
        }
    }

    Ok(MintRun {
        requested: number,
        outcomes,
        state,
        balance,
        stop,
    })
}

pub async fn process_mint(args: MintArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let context = mint_setup(args.keypair, args.rpc_url, &config)?;
    let payer = context.keypair.pubkey();
    let number = args.number.unwrap_or(1);

    println!(
        "{} {}Loading candy machine",
        style("[1/2]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let pb = spinner_with_style();
    pb.set_message("Connecting...");

    let state = load_state(&context.rpc, &config, &payer)?;
    let balance = context.rpc.fetch_balance(&payer)?;

    pb.finish_and_clear();

    check_candy_machine(&state, &config)?;

    println!(
        "\n{}{} {}",
        CANDY_EMOJI,
        style("Candy machine ID:").dim(),
        &config.candy_machine_id
    );
    println!(
        "{}{} {} ({})",
        COMPUTER_EMOJI,
        style("Wallet:").dim(),
        shorten_address(&payer.to_string(), 4),
        context.rpc_url
    );
    print_progress(&state, balance);

    println!(
        "\n{} {}Minting from candy machine",
        style("[2/2]").bold().dim(),
        CANDY_EMOJI
    );

    let run = run_mints(
        &context.rpc,
        &config,
        &context.keypair,
        state,
        number,
        args.wait,
        &args.interrupt,
    )
    .await?;

    let minted = run.minted();

    match run.stop {
        None => Ok(()),
        Some(stop @ (MintStop::SoldOut | MintStop::ClaimedAll)) if minted > 0 => {
            warn!("Minted {} of {} requested NFTs", minted, run.requested);
            println!(
                "\n{}{} {}",
                WARNING_EMOJI,
                style(stop.message()).yellow(),
                style(format!("Minted {} of {} requested NFTs", minted, run.requested)).yellow()
            );
            Ok(())
        }
        Some(stop) => Err(anyhow!(stop.message())),
    }
}
