//! Misc utils

use ethers::{
    types::{Address, Bytes, U128, U256},
    utils::to_checksum,
};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Converts Option address to checksum
pub fn as_checksum_addr_opt<S>(val: &Option<Address>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if let Some(addr) = val {
        s.serialize_str(&to_checksum(addr, None))
    } else {
        s.serialize_none()
    }
}

/// Concatenates factory address and factory data into init code (empty without factory)
pub fn pack_factory_data(factory: Option<Address>, factory_data: &Bytes) -> Bytes {
    match factory {
        Some(factory) if !factory.is_zero() => {
            [factory.0.to_vec(), factory_data.to_vec()].concat().into()
        }
        _ => Bytes::default(),
    }
}

/// Concatenates paymaster address, its gas limits and paymaster data (empty without paymaster)
pub fn pack_paymaster_data(
    paymaster: Option<Address>,
    paymaster_verification_gas_limit: U256,
    paymaster_post_op_gas_limit: U256,
    paymaster_data: &Bytes,
) -> Bytes {
    match paymaster {
        Some(paymaster) if !paymaster.is_zero() => {
            let gas_data =
                pack_uint128(paymaster_verification_gas_limit, paymaster_post_op_gas_limit);
            [paymaster.0.to_vec(), gas_data.to_vec(), paymaster_data.to_vec()].concat().into()
        }
        _ => Bytes::default(),
    }
}

/// Packs two uint128
pub fn pack_uint128(a: U256, b: U256) -> [u8; 32] {
    let mut res = [0u8; 32];
    let a: U128 = {
        let mut tem = [0; 32];
        a.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    let b: U128 = {
        let mut tem = [0; 32];
        b.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    a.to_big_endian(&mut res[0..16]);
    b.to_big_endian(&mut res[16..32]);
    res
}
