//! Packet example
//!
//! Encodes and decodes a packet with a variable payload and a trailing checksum.
//!
//! Run: cargo run --example packet

use varstruct::config::VarStructConfig;
use varstruct::prelude::*;

varstruct::varstruct! {
    /// Wire packet: id, payload bytes, crc of the payload.
    pub struct Packet {
        scalar id: u32,
        scalar payload_len: u16,
        array payload: u8,
        scalar crc: u64,
    }
}

fn checksum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0xCBF2_9CE4_8422_2325u64, |h, &b| (h ^ b as u64).wrapping_mul(0x100_0000_01B3))
}

fn main() -> Result<()> {
    println!("=== varstruct packet example ===\n");

    // 1. Resolver, honouring VARSTRUCT_CONFIG and VARSTRUCT__ overrides
    println!("--- 1. Resolver ---");
    let config = VarStructConfig::load_from_env().unwrap_or_else(|err| {
        println!("  ignoring config: {err}");
        VarStructConfig::default()
    });
    let resolver = Resolver::from_config(&config);
    println!("  limits: {:?}\n", resolver.limits());

    // 2. Size and encode
    println!("--- 2. Encode ---");
    let f = Packet::fields();
    let message = b"variable length payload";
    let lengths = [message.len()];

    let total = resolver.resolve(Packet::schema(), &lengths)?.total_size();
    let mut wire = vec![0u8; total];
    {
        let mut view = resolver.resolve_mut(Packet::schema(), &mut wire, &lengths)?;
        view.set(f.id, 42);
        view.set(f.payload_len, message.len() as u16);
        view.copy_from_slice(f.payload, message)?;
        view.set(f.crc, checksum(message));
        println!("  crc at offset {}", view.start(f.crc));
    }
    println!("  encoded {total} bytes\n");

    // 3. Decode: the fixed prefix tells us the array length
    println!("--- 3. Decode ---");
    let prefix = resolver.resolve_ref(Packet::schema(), &wire, &[0])?;
    let len = prefix.get(f.payload_len) as usize;

    let view = resolver.resolve_ref(Packet::schema(), &wire, &[len])?;
    let payload = view.field_bytes(f.payload);
    println!("  id      = {}", view.get(f.id));
    println!("  payload = {}", String::from_utf8_lossy(payload));
    println!("  crc ok  = {}", view.get(f.crc) == checksum(payload));

    // 4. Bounds policy
    println!("\n--- 4. Bounds ---");
    match view.get_at(f.payload, len, BoundsCheck::Checked) {
        Ok(byte) => println!("  unexpected byte {byte}"),
        Err(err) => println!("  checked read rejected: {err}"),
    }

    Ok(())
}
