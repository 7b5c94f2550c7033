//! Operations that can be placed in a transaction.
//!
//! JSON uses the condenser form `["vote", {"voter": ...}]`; the binary form
//! is the operation id as a varint followed by the fields in declaration
//! order.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keys::Authority;
use crate::transaction::asset::Asset;
use crate::transaction::encoding::{Encode, Encoder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOperation {
    pub voter: String,
    pub author: String,
    pub permlink: String,
    /// Vote weight in basis points, -10000..=10000.
    pub weight: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOperation {
    pub parent_author: String,
    pub parent_permlink: String,
    pub author: String,
    pub permlink: String,
    pub title: String,
    pub body: String,
    pub json_metadata: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    pub from: String,
    pub to: String,
    pub amount: Asset,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToVestingOperation {
    pub from: String,
    pub to: String,
    pub amount: Asset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawVestingOperation {
    pub account: String,
    pub vesting_shares: Asset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessVoteOperation {
    pub account: String,
    pub witness: String,
    pub approve: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessProxyOperation {
    pub account: String,
    pub proxy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommentOperation {
    pub author: String,
    pub permlink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    #[serde(default)]
    pub required_auths: Vec<String>,
    #[serde(default)]
    pub required_posting_auths: Vec<String>,
    pub id: String,
    pub json: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToSavingsOperation {
    pub from: String,
    pub to: String,
    pub amount: Asset,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRewardBalanceOperation {
    pub account: String,
    pub reward_steem: Asset,
    pub reward_sbd: Asset,
    pub reward_vests: Asset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateVestingSharesOperation {
    pub delegator: String,
    pub delegatee: String,
    pub vesting_shares: Asset,
}

macro_rules! encode_fields {
    (@field $out:ident, $value:expr, str) => { $out.str(&$value) };
    (@field $out:ident, $value:expr, i16) => { $out.i16($value) };
    (@field $out:ident, $value:expr, bool) => { $out.bool($value) };
    (@field $out:ident, $value:expr, asset) => { $out.encode(&$value) };
    (@field $out:ident, $value:expr, set) => { $out.string_set(&$value) };
    ($ty:ty => $($field:ident: $kind:ident),+ $(,)?) => {
        impl Encode for $ty {
            fn encode(&self, out: &mut Encoder) {
                $( encode_fields!(@field out, self.$field, $kind); )+
            }
        }
    };
}

encode_fields!(VoteOperation => voter: str, author: str, permlink: str, weight: i16);
encode_fields!(CommentOperation =>
    parent_author: str, parent_permlink: str, author: str, permlink: str,
    title: str, body: str, json_metadata: str);
encode_fields!(TransferOperation => from: str, to: str, amount: asset, memo: str);
encode_fields!(TransferToVestingOperation => from: str, to: str, amount: asset);
encode_fields!(WithdrawVestingOperation => account: str, vesting_shares: asset);
encode_fields!(AccountWitnessVoteOperation => account: str, witness: str, approve: bool);
encode_fields!(AccountWitnessProxyOperation => account: str, proxy: str);
encode_fields!(DeleteCommentOperation => author: str, permlink: str);
encode_fields!(CustomJsonOperation =>
    required_auths: set, required_posting_auths: set, id: str, json: str);
encode_fields!(TransferToSavingsOperation => from: str, to: str, amount: asset, memo: str);
encode_fields!(ClaimRewardBalanceOperation =>
    account: str, reward_steem: asset, reward_sbd: asset, reward_vests: asset);
encode_fields!(DelegateVestingSharesOperation =>
    delegator: str, delegatee: str, vesting_shares: asset);

macro_rules! operations {
    ($($variant:ident($body:ty) = $id:literal, $name:literal;)+) => {
        /// A single state-changing instruction.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Operation {
            $($variant($body),)+
        }

        impl Operation {
            /// Protocol operation id.
            pub fn id(&self) -> u64 {
                match self {
                    $(Operation::$variant(_) => $id,)+
                }
            }

            /// Protocol operation name, e.g. `"vote"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Operation::$variant(_) => $name,)+
                }
            }
        }

        impl Encode for Operation {
            fn encode(&self, out: &mut Encoder) {
                out.varint(self.id());
                match self {
                    $(Operation::$variant(body) => body.encode(out),)+
                }
            }
        }

        impl Serialize for Operation {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Operation::$variant(body) => ($name, body).serialize(serializer),)+
                }
            }
        }

        impl<'de> Deserialize<'de> for Operation {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let (name, body): (String, serde_json::Value) = Deserialize::deserialize(deserializer)?;
                match name.as_str() {
                    $($name => serde_json::from_value(body)
                        .map(Operation::$variant)
                        .map_err(D::Error::custom),)+
                    other => Err(D::Error::custom(format!("unsupported operation '{}'", other))),
                }
            }
        }
    };
}

operations! {
    Vote(VoteOperation) = 0, "vote";
    Comment(CommentOperation) = 1, "comment";
    Transfer(TransferOperation) = 2, "transfer";
    TransferToVesting(TransferToVestingOperation) = 3, "transfer_to_vesting";
    WithdrawVesting(WithdrawVestingOperation) = 4, "withdraw_vesting";
    AccountWitnessVote(AccountWitnessVoteOperation) = 12, "account_witness_vote";
    AccountWitnessProxy(AccountWitnessProxyOperation) = 13, "account_witness_proxy";
    DeleteComment(DeleteCommentOperation) = 17, "delete_comment";
    CustomJson(CustomJsonOperation) = 18, "custom_json";
    TransferToSavings(TransferToSavingsOperation) = 32, "transfer_to_savings";
    ClaimRewardBalance(ClaimRewardBalanceOperation) = 39, "claim_reward_balance";
    DelegateVestingShares(DelegateVestingSharesOperation) = 40, "delegate_vesting_shares";
}

impl Operation {
    /// The key role that must sign this operation.
    pub fn required_authority(&self) -> Authority {
        match self {
            Operation::Vote(_)
            | Operation::Comment(_)
            | Operation::DeleteComment(_)
            | Operation::ClaimRewardBalance(_) => Authority::Posting,
            Operation::CustomJson(op) if op.required_auths.is_empty() => Authority::Posting,
            Operation::CustomJson(_)
            | Operation::Transfer(_)
            | Operation::TransferToVesting(_)
            | Operation::WithdrawVesting(_)
            | Operation::AccountWitnessVote(_)
            | Operation::AccountWitnessProxy(_)
            | Operation::TransferToSavings(_)
            | Operation::DelegateVestingShares(_) => Authority::Active,
        }
    }
}
