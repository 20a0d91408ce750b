//! Minimal command-line harness for the ARM60 interpreter: load a flat
//! binary image, run it for a cycle budget, and print the resulting
//! register file (§10.4). Deliberately thin — no disassembly view, no
//! GUI, no ISO traversal.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arm60_core::bus::FlatBus;
use arm60_core::cpu::Cpu;
use clap::Parser;

/// Run a flat ARM60 binary image for a fixed cycle budget and dump the
/// final register file.
#[derive(Parser, Debug)]
#[command(name = "arm60", version, about)]
struct Args {
    /// Path to a flat binary image, loaded at address 0.
    image: PathBuf,

    /// Starting program counter.
    #[arg(long, default_value_t = 0, value_parser = parse_maybe_hex)]
    pc: u32,

    /// Number of cycles to execute (the interpreter may overshoot since
    /// instructions are not preemptible).
    #[arg(long, default_value_t = 1000)]
    cycles: u64,

    /// Size of the flat memory backing the bus, in bytes.
    #[arg(long, default_value_t = 1 << 20)]
    memory_size: usize,

    /// Treat the bus as big-endian for unaligned word loads and swaps.
    #[arg(long)]
    big_endian: bool,
}

fn parse_maybe_hex(s: &str) -> Result<u32, std::num::ParseIntError> {
    s.strip_prefix("0x")
        .map_or_else(|| s.parse(), |hex| u32::from_str_radix(hex, 16))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let image = fs::read(&args.image)
        .with_context(|| format!("reading image {}", args.image.display()))?;

    let mut bus = FlatBus::new(args.memory_size);
    bus.load(0, &image);

    let mut cpu = Cpu::new(bus);
    cpu.set_big_endian(args.big_endian);
    cpu.registers_mut().set_program_counter(args.pc);

    let executed = cpu.execute_cycles(args.cycles);

    println!("executed {executed} cycles (requested {})", args.cycles);
    println!("PC:   0x{:08X}", cpu.registers().program_counter());
    for (id, value) in cpu.registers().to_vec().iter().enumerate() {
        println!("R{id:<2}: 0x{value:08X}");
    }
    let cpsr = cpu.registers().cpsr();
    println!(
        "CPSR: mode={:?} N={} Z={} C={} V={}",
        cpsr.mode(),
        u8::from(cpsr.sign_flag()),
        u8::from(cpsr.zero_flag()),
        u8::from(cpsr.carry_flag()),
        u8::from(cpsr.overflow_flag()),
    );

    Ok(())
}
