//! edu32 Emulator - CLI Entry Point
//!
//! Commands:
//! - `edu32-emu run <program>` - Run a program image until it halts

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "edu32-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A 32-bit instructional virtual CPU emulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program image until it halts
    Run {
        /// Path to the image to execute (.hex text or raw binary)
        program: String,
        /// Maximum number of instructions to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_steps: u64,
        /// Memory buffer size in bytes
        #[arg(long, default_value = "65536")]
        mem_size: usize,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
        /// Dump the final machine state as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            program,
            max_steps,
            mem_size,
            trace,
            json,
        }) => {
            run_program(&program, max_steps, mem_size, trace, json);
        }
        None => {
            println!("edu32 Emulator v0.1.0");
            println!("A 32-bit instructional virtual CPU");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_program();
        }
    }
}

fn run_program(path: &str, max_steps: u64, mem_size: usize, trace: bool, json: bool) {
    use edu32::cpu::fetch;
    use edu32::{load_image, Instruction, Outcome, Register, Vm};

    println!("🔧 Running: {}", path);

    let image = match load_image(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    if image.is_empty() {
        eprintln!("❌ No instructions to execute");
        std::process::exit(1);
    }

    println!("📂 Loaded {} bytes", image.len());

    let mut vm = Vm::new(mem_size);
    if let Err(e) = vm.load_image(&image) {
        eprintln!("❌ Failed to load program: {}", e);
        std::process::exit(1);
    }
    // Stack grows down from the top of memory
    vm.regs.set_sp(mem_size as u32);

    println!();
    println!("━━━ Execution ━━━");

    while vm.is_running() && vm.steps < max_steps {
        let pc = vm.regs.pc();
        let fetched = fetch(&vm.mem, pc);

        match vm.step() {
            Ok(outcome) => {
                if trace {
                    if let Ok(instr) = Instruction::decode(fetched.opcode) {
                        println!(
                            "{:#07x}: {:<8} eax={:#010x} {}",
                            pc,
                            instr.to_string(),
                            vm.regs.read(Register::Eax),
                            vm.regs.flags()
                        );
                    }
                }
                if outcome == Outcome::Halted {
                    break;
                }
            }
            Err(e) => {
                eprintln!("❌ Machine fault at pc={:#x}: {}", pc, e);
                std::process::exit(1);
            }
        }
    }

    println!();
    println!("━━━ Result ━━━");
    if json {
        match serde_json::to_string_pretty(&vm) {
            Ok(snapshot) => println!("{}", snapshot),
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        report(&vm);
    }

    if vm.steps >= max_steps && !vm.is_halted() {
        println!();
        println!(
            "⚠️  Reached max steps limit ({}). Use --max-steps to increase.",
            max_steps
        );
    }
}

fn report(vm: &edu32::Vm) {
    use edu32::Register;

    println!("Steps:  {}", vm.steps);
    match vm.status() {
        Some(status) => println!("Status: {}", status),
        None => println!("Status: unknown ({:#x})", vm.regs.status_raw()),
    }
    for reg in Register::GENERAL {
        println!("{:>6}: {:#010x} ({})", reg, vm.regs.read(reg), vm.regs.read(reg) as i32);
    }
    println!("{:>6}: {:#010x}", Register::Pc, vm.regs.pc());
    println!("{:>6}: {}", Register::Flags, vm.regs.flags());
}

fn demo_program() {
    use edu32::{Register, Vm};

    println!("━━━ Demo ━━━");
    println!();

    // irmovl $40, %eax; irmovl $2, %ecx; addl %ecx into %eax; halt
    let image = [
        0x30, 0xF0, 40, 0, 0, 0, //
        0x30, 0xF1, 2, 0, 0, 0, //
        0x60, 0x01, //
        0x00,
    ];

    let mut vm = Vm::new(256);
    if vm.load_image(&image).is_err() {
        return;
    }
    vm.regs.set_sp(256);

    match vm.run(100) {
        Ok(executed) => {
            println!("Executed {} instructions", executed);
            println!("eax = {}", vm.regs.read(Register::Eax));
            println!();
            println!("✓ Core execution engine working!");
        }
        Err(e) => eprintln!("❌ Demo failed: {}", e),
    }
}
