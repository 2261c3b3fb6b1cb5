// In demos/host.rs
//
// Load a service library and print what it produces, one message per
// notification, until the message budget is used up or Ctrl+C.
//
//   cargo build -p color-service
//   cargo run --example host -- target/debug/libcolor_service.so 5 get_hexa_color
//   cargo run --example host -- target/debug/libtext_service.so 5 get_text
use service_bridge::Host::{Dispatcher, ServiceLibrary, Turn};
use service_bridge::{trace::init_tracing, Bridge};
use std::env;
use std::ffi::{c_char, c_void, CStr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

type HexaColorFn = unsafe extern "C" fn(*const c_void) -> u32;
type TextFn = unsafe extern "C" fn(*const c_void) -> *const c_char;

enum Accessor {
    Color(HexaColorFn),
    Text(TextFn),
    Raw,
}

impl Accessor {
    fn describe(&self, msg: *const c_void) -> String {
        match self {
            Accessor::Color(f) => format!("#{:08X}", unsafe { f(msg) }),
            Accessor::Text(f) => unsafe { CStr::from_ptr(f(msg)) }
                .to_string_lossy()
                .into_owned(),
            Accessor::Raw => format!("{:p}", msg),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <library_path> <num_messages> [accessor]", args[0]);
        std::process::exit(1);
    }

    let budget: u64 = args[2].parse()?;
    let library = ServiceLibrary::open(&args[1])?;

    let accessor = match args.get(3).map(String::as_str) {
        Some("get_hexa_color") => Accessor::Color(unsafe { library.symbol("get_hexa_color")? }),
        Some(name @ "get_text") => Accessor::Text(unsafe { library.symbol(name)? }),
        Some(other) => {
            eprintln!("Unknown accessor {}, printing raw pointers", other);
            Accessor::Raw
        }
        None => Accessor::Raw,
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_for_handler = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupted_for_handler.store(true, Ordering::SeqCst);
    })?;

    let mut dispatcher = Dispatcher::new(&library)?;
    library.start_service();
    println!("Host: started {}", library.path().display());

    let mut received = 0;
    while received < budget && !interrupted.load(Ordering::SeqCst) {
        let turn = dispatcher.turn(Duration::from_millis(250), |msg| {
            println!("{:<6} {}", received + 1, accessor.describe(msg.as_ptr()));
        });
        if turn == Turn::Handled {
            received += 1;
        }
    }

    library.stop_service();
    println!("Host: received {} messages", received);
    Ok(())
}
