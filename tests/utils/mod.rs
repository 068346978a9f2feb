use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    },
};

use anchor_client::solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use anchor_lang::AnchorSerialize;
use anyhow::{anyhow, Result};
use candy_mint::{
    candy_machine::{account_discriminator, CandyMachineAccount, CandyMachineData},
    config::{MintConfig, PollConfig},
    constants::TOKEN_PROGRAM_ID,
    pdas::find_ata_for_mint,
    rpc::{ChainRpc, SignatureOutcome},
};

pub fn test_start(input: &str) {
    println!("\n========================================");
    println!("{}", input);
    println!("========================================\n");
}

/// What the mock cluster does with a submitted transaction.
pub enum Submission {
    /// Accept it, redeem one item and charge the payer the mint price.
    Redeem,
    /// Accept it without touching any account.
    Accept,
    /// Fail the `sendTransaction` call with this message.
    Reject(String),
}

/// In-memory cluster with scripted signature statuses.
pub struct MockRpc {
    pub accounts: Mutex<HashMap<Pubkey, Account>>,
    pub token_balances: Mutex<HashMap<Pubkey, u64>>,
    pub statuses: Mutex<VecDeque<Option<SignatureOutcome>>>,
    pub submitted: Mutex<Vec<Transaction>>,
    pub submission: Submission,
    pub candy_machine: Pubkey,
    pub candy_machine_reads: AtomicU32,
}

impl MockRpc {
    pub fn new(candy_machine: Pubkey, submission: Submission) -> Self {
        MockRpc {
            accounts: Mutex::new(HashMap::new()),
            token_balances: Mutex::new(HashMap::new()),
            statuses: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            submission,
            candy_machine,
            candy_machine_reads: AtomicU32::new(0),
        }
    }

    pub fn set_candy_machine(&self, program_id: &Pubkey, account: &CandyMachineAccount) {
        let mut data = account_discriminator().to_vec();
        data.extend(account.try_to_vec().unwrap());
        data.extend([0u8; 32]);

        self.accounts.lock().unwrap().insert(
            self.candy_machine,
            Account {
                lamports: 1_000_000,
                data,
                owner: *program_id,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn candy_machine_account(&self) -> CandyMachineAccount {
        let accounts = self.accounts.lock().unwrap();
        let account = accounts.get(&self.candy_machine).unwrap();
        CandyMachineAccount::decode(&self.candy_machine, &account.data).unwrap()
    }

    pub fn set_token_account(&self, owner: &Pubkey, mint: &Pubkey, amount: u64) -> Pubkey {
        let address = find_ata_for_mint(owner, mint);
        self.accounts.lock().unwrap().insert(
            address,
            Account {
                lamports: 2_039_280,
                data: vec![0u8; 165],
                owner: TOKEN_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
        self.token_balances.lock().unwrap().insert(address, amount);
        address
    }

    pub fn push_status(&self, status: Option<SignatureOutcome>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn candy_machine_reads(&self) -> u32 {
        self.candy_machine_reads.load(Ordering::SeqCst)
    }

    pub fn lamports(&self, pubkey: &Pubkey) -> u64 {
        self.accounts
            .lock()
            .unwrap()
            .get(pubkey)
            .map(|account| account.lamports)
            .unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ChainRpc for MockRpc {
    fn fetch_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        if *pubkey == self.candy_machine {
            self.candy_machine_reads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.accounts.lock().unwrap().get(pubkey).cloned())
    }

    fn fetch_token_balance(&self, token_account: &Pubkey) -> Result<u64> {
        self.token_balances
            .lock()
            .unwrap()
            .get(token_account)
            .copied()
            .ok_or_else(|| anyhow!("could not find token account {}", token_account))
    }

    fn fetch_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        Ok(self.lamports(pubkey))
    }

    fn rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(6_960 * (data_len as u64 + 128))
    }

    fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }

    fn submit_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        match &self.submission {
            Submission::Reject(message) => return Err(anyhow!(message.clone())),
            Submission::Redeem => {
                let mut account = self.candy_machine_account();
                account.items_redeemed += 1;
                let program_id = self.accounts.lock().unwrap()[&self.candy_machine].owner;
                self.set_candy_machine(&program_id, &account);

                let fee_payer = transaction.message.account_keys[0];
                if let Some(payer) = self.accounts.lock().unwrap().get_mut(&fee_payer) {
                    payer.lamports = payer.lamports.saturating_sub(account.data.price);
                }
            }
            Submission::Accept => {}
        }

        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    fn signature_status(&self, _signature: &Signature) -> Result<Option<SignatureOutcome>> {
        Ok(self.statuses.lock().unwrap().pop_front().flatten())
    }
}

pub fn candy_machine_account(
    wallet: Pubkey,
    config: Pubkey,
    token_mint: Option<Pubkey>,
    available: u64,
    redeemed: u64,
    go_live_date: Option<i64>,
) -> CandyMachineAccount {
    CandyMachineAccount {
        authority: Pubkey::new_unique(),
        wallet,
        token_mint,
        config,
        data: CandyMachineData {
            uuid: "7xJ2Vb".to_string(),
            price: 1_000_000_000,
            items_available: available,
            go_live_date,
        },
        items_redeemed: redeemed,
        bump: 253,
    }
}

pub fn mint_config(
    program_id: Pubkey,
    candy_machine_id: Pubkey,
    config: Pubkey,
    treasury: Pubkey,
    payment_token_mint: Option<Pubkey>,
) -> MintConfig {
    MintConfig {
        cluster: Some("devnet".to_string()),
        program_id,
        candy_machine_id,
        config,
        treasury,
        payment_token_mint,
        start_date: None,
        poll: PollConfig::default(),
    }
}

/// A funded payer registered with the mock cluster.
pub fn funded_payer(rpc: &MockRpc, lamports: u64) -> Keypair {
    use anchor_client::solana_sdk::signature::Signer;

    let payer = Keypair::new();
    rpc.accounts.lock().unwrap().insert(
        payer.pubkey(),
        Account {
            lamports,
            data: vec![],
            owner: anchor_client::solana_sdk::system_program::ID,
            executable: false,
            rent_epoch: 0,
        },
    );
    payer
}
