use std::io::BufRead;
use std::sync::mpsc::{channel, Sender};

use cloth::controller_message::ControllerMessage;
use cloth::interaction::MouseMode;
use cloth::pworld::PWorld;
use cloth::V3;
use protocol::sock::SockServer;

fn parse_point(words: &[&str]) -> Option<(V3, f32)> {
	let v: Vec<f32> = words.iter().filter_map(|w| w.parse().ok()).collect();
	match v[..] {
		[x, y, z] => Some((V3::new(x, y, z), 0.3)),
		[x, y, z, r] => Some((V3::new(x, y, z), r)),
		_ => None,
	}
}

fn parse_line(line: &str) -> Option<ControllerMessage> {
	let words: Vec<&str> = line.split_whitespace().collect();
	let (cmd, rest) = words.split_first()?;
	let mode = match *cmd {
		"p" => return Some(ControllerMessage::TogglePause),
		"f" => return Some(ControllerMessage::FrameForward),
		"r" => return Some(ControllerMessage::Rebuild),
		"d" => return Some(ControllerMessage::Reset),
		"u" => return Some(ControllerMessage::UnfixAll),
		"h" => return Some(ControllerMessage::AutoDistanceHooks),
		"q" => return Some(ControllerMessage::Quit),
		"grab" => MouseMode::Grab,
		"pull" => MouseMode::Pull,
		"push" => MouseMode::Push,
		"tear" => MouseMode::Tear,
		"fire" => MouseMode::Fire,
		"pin" => MouseMode::Pin,
		_ => return None,
	};
	let (point, radius) = parse_point(rest)?;
	Some(ControllerMessage::Interact(mode, point, radius))
}

fn read_commands(tx: Sender<ControllerMessage>) {
	for line in std::io::stdin().lock().lines() {
		let Ok(line) = line else { break };
		match parse_line(&line) {
			Some(msg) => {
				if tx.send(msg).is_err() {
					break;
				}
			}
			None => log::warn!("unknown command: {}", line),
		}
	}
}

fn main() {
	env_logger::init();
	let path = std::env::args()
		.nth(1)
		.unwrap_or_else(|| "/tmp/cloth.socket".to_string());
	let mut server = match SockServer::bind(&path) {
		Ok(server) => server,
		Err(e) => {
			eprintln!("cannot bind {}: {}", path, e);
			std::process::exit(1);
		}
	};
	let (tx, rx) = channel();
	let _ = std::thread::spawn(move || read_commands(tx));
	let mut world = PWorld::default();
	world.run_thread(&mut server, rx);
	let _ = std::fs::remove_file(path);
}
