use std::error::Error;
use std::fs::File;
use std::time::Duration;

use clap::{App, Arg};
use log::{error, info};
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels;

use chip8::chip8::PIXEL_ON;
use chip8::{Chip8, Config, Quirks, Variant};

// window is sized for the high-res surface; low-res frames are stretched to fit
const WINDOW_SCALE: u32 = 5;

// 1 2 3 C / 4 5 6 D / 7 8 9 E / A 0 B F on the left hand of a QWERTY board
fn keypad_index(key: Keycode) -> Option<usize> {
    let k = match key {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,
        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(k)
}

fn parse_variant(name: &str) -> Variant {
    match name {
        "chip8x" => Variant::Chip8X,
        "chip8e" => Variant::Chip8E,
        _ => Variant::SuperChip,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = App::new("chip8")
        .about("CHIP-8 / SuperChip interpreter")
        .arg(
            Arg::with_name("ROM")
                .help("program image to load at 0x200")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("variant")
                .long("variant")
                .takes_value(true)
                .possible_values(&["schip", "chip8x", "chip8e"])
                .default_value("schip")
                .help("dialect for opcodes the extensions disagree on"),
        )
        .arg(
            Arg::with_name("shift-vy")
                .long("shift-vy")
                .help("8XY6/8XYE shift VY into VX"),
        )
        .arg(
            Arg::with_name("advance-index")
                .long("advance-index")
                .help("FX55/FX65 advance I past the registers"),
        )
        .arg(
            Arg::with_name("upscale")
                .long("upscale")
                .help("draw low-res mode on a 128x64 surface"),
        )
        .arg(
            Arg::with_name("dots")
                .long("dots")
                .requires("upscale")
                .help("upscaled low-res sprites draw single dots"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("fixed seed for the random opcode"),
        )
        .arg(
            Arg::with_name("hz")
                .long("hz")
                .takes_value(true)
                .default_value("60")
                .help("cycles (and timer ticks) per second"),
        )
        .get_matches();

    let quirks = Quirks {
        shift_uses_vy: matches.is_present("shift-vy"),
        bulk_transfer_advances_index: matches.is_present("advance-index"),
        lores_as_dots: matches.is_present("dots"),
    };
    let mut config = Config::default()
        .with_quirks(quirks)
        .with_variant(parse_variant(matches.value_of("variant").unwrap_or("schip")))
        .with_upscaled_lores(matches.is_present("upscale"));
    if let Some(seed) = matches.value_of("seed") {
        config = config.with_seed(seed.parse()?);
    }
    let hz: u64 = matches.value_of("hz").unwrap_or("60").parse()?;

    let mut emu = Chip8::with_config(config);
    let rom = matches.value_of("ROM").unwrap_or_default();
    emu.load_program_from(File::open(rom)?)?;
    info!("running {} with {:?}", rom, config);

    let sdl_ctx = sdl2::init()?;
    let video = sdl_ctx.video()?;

    let (win_w, win_h) = (128 * WINDOW_SCALE, 64 * WINDOW_SCALE);
    let window = video
        .window("CHIP-8", win_w, win_h)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;

    let black = pixels::Color::RGB(0, 0, 0);
    let white = pixels::Color::RGB(255, 255, 255);
    canvas.set_draw_color(black);
    canvas.clear();
    canvas.present();

    let mut event_pump = sdl_ctx.event_pump()?;

    let sleep = Duration::from_micros(1_000_000 / hz.max(1));
    let mut beeping = false;

    'main: loop {
        if let Err(fault) = emu.step() {
            error!("program stopped: {}", fault);
        }

        if emu.draw_flag() {
            let fb = emu.display();
            let px = (win_w as usize / fb.width()) as i16;
            canvas.set_draw_color(black);
            canvas.clear();
            for (i, p) in fb.pixels().iter().enumerate() {
                if *p != PIXEL_ON {
                    continue;
                }
                let x = (i % fb.width()) as i16 * px;
                let y = (i / fb.width()) as i16 * px;
                canvas.box_(x, y, x + px - 1, y + px - 1, white)?;
            }
            canvas.present();
        }

        if emu.sound_active() != beeping {
            beeping = emu.sound_active();
            info!("buzzer {}", if beeping { "on" } else { "off" });
        }

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(k) = keypad_index(key) {
                        emu.press_key(k);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(k) = keypad_index(key) {
                        emu.release_key(k);
                    }
                }
                _ => {}
            }
        }

        if emu.is_halted() {
            info!("halted: {:?}", emu.run_state());
            break 'main;
        }

        std::thread::sleep(sleep);
    }

    Ok(())
}
