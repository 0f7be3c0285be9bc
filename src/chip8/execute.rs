//! Instruction handlers. The program counter has already been advanced past
//! the instruction word when any of these run, so a skip adds another 2.

use log::{debug, warn};

use super::display::Resolution;
use super::error::Fault;
use super::font;
use super::instruction::Instruction;
use super::random::ByteSource;
use super::state::{State, RPL_FLAG_COUNT, VF};

/// Apply one decoded instruction to `state`.
pub fn execute(
    state: &mut State,
    rng: &mut ByteSource,
    instruction: Instruction,
) -> Result<(), Fault> {
    use Instruction::*;

    match instruction {
        ClearScreen => state.display.clear(),
        Return => state.pc = state.pop()?,
        ScrollUp(n) => state.display.scroll_up(usize::from(n)),
        ScrollDown(n) => state.display.scroll_down(usize::from(n)),
        ToggleIndexQuirk => {
            let quirks = &mut state.quirks;
            quirks.bulk_transfer_advances_index = !quirks.bulk_transfer_advances_index;
            debug!(
                "bulk transfer index advance now {}",
                quirks.bulk_transfer_advances_index
            );
        }
        ScrollRight => state.display.scroll_right(4),
        ScrollLeft => state.display.scroll_left(4),
        Exit => {
            debug!("program requested exit");
            state.exit_requested = true;
        }
        LowRes => state.display.set_resolution(Resolution::Low),
        HighRes => state.display.set_resolution(Resolution::High),

        Jump(nnn) => state.pc = nnn,
        JumpOffset(nnn) => state.pc = nnn + u16::from(state.v[0]),
        Call(nnn) => {
            state.push(state.pc)?;
            state.pc = nnn;
        }
        SkipEqImm { x, kk } => state.skip_if(state.reg(x) == kk),
        SkipNeImm { x, kk } => state.skip_if(state.reg(x) != kk),
        SkipEq { x, y } => state.skip_if(state.reg(x) == state.reg(y)),
        SkipNe { x, y } => state.skip_if(state.reg(x) != state.reg(y)),
        SkipGt { x, y } => state.skip_if(state.reg(x) > state.reg(y)),
        SkipLt { x, y } => state.skip_if(state.reg(x) < state.reg(y)),

        LoadImm { x, kk } => state.set_reg(x, kk),
        AddImm { x, kk } => state.set_reg(x, state.reg(x).wrapping_add(kk)),
        Copy { x, y } => state.set_reg(x, state.reg(y)),
        Or { x, y } => state.set_reg(x, state.reg(x) | state.reg(y)),
        And { x, y } => state.set_reg(x, state.reg(x) & state.reg(y)),
        Xor { x, y } => state.set_reg(x, state.reg(x) ^ state.reg(y)),
        Add { x, y } => {
            let (sum, carry) = state.reg(x).overflowing_add(state.reg(y));
            state.set_reg(x, sum);
            state.v[VF] = carry as u8;
        }
        Sub { x, y } => {
            let (vx, vy) = (state.reg(x), state.reg(y));
            state.set_reg(x, vx.wrapping_sub(vy));
            state.v[VF] = (vx > vy) as u8;
        }
        SubReverse { x, y } => {
            let (vx, vy) = (state.reg(x), state.reg(y));
            state.set_reg(x, vy.wrapping_sub(vx));
            state.v[VF] = (vy > vx) as u8;
        }
        ShiftRight { x, y } => {
            let src = shift_source(state, x, y);
            state.v[VF] = src & 0x1;
            state.set_reg(x, src >> 1);
        }
        ShiftLeft { x, y } => {
            let src = shift_source(state, x, y);
            state.v[VF] = (src & 0x80) >> 7;
            state.set_reg(x, src << 1);
        }
        Mul { x, y } => {
            let product = u16::from(state.reg(x)) * u16::from(state.reg(y));
            state.set_reg(x, (product & 0xFF) as u8);
            state.v[VF] = (product >> 8) as u8;
        }
        Div { x, y } => {
            let (vx, vy) = (state.reg(x), state.reg(y));
            if vy == 0 {
                warn!("DIV V{:X}, V{:X} by zero ignored", x, y);
            } else {
                state.set_reg(x, vx / vy);
                state.v[VF] = vx % vy;
            }
        }
        AddColor { x, y } => {
            // each nibble is a 0-7 colour coordinate
            let (vx, vy) = (state.reg(x), state.reg(y));
            let hi = ((vx >> 4) + (vy >> 4)) & 0x7;
            let lo = ((vx & 0xF) + (vy & 0xF)) & 0x7;
            state.set_reg(x, hi << 4 | lo);
        }

        LoadIndex(nnn) => state.i = nnn,
        AddIndex { x } => state.i = state.i.wrapping_add(u16::from(state.reg(x))),
        Random { x, kk } => state.set_reg(x, rng.next_byte() & kk),
        SmallFont { x } => state.i = font::small_glyph_addr(state.reg(x)),
        LargeFont { x } => state.i = font::large_glyph_addr(state.reg(x)),
        Bcd { x } => {
            let mut value = state.reg(x);
            let digits = state.write(state.i, 3)?;
            for digit in digits.iter_mut().rev() {
                *digit = value % 10;
                value /= 10;
            }
        }
        Bcd16 { x, y } => {
            let mut value = u16::from(state.reg(x)) << 8 | u16::from(state.reg(y));
            let digits = state.write(state.i, 5)?;
            for digit in digits.iter_mut().rev() {
                *digit = (value % 10) as u8;
                value /= 10;
            }
        }
        Store { x } => {
            let count = usize::from(x) + 1;
            let v = state.v;
            state.write(state.i, count)?.copy_from_slice(&v[..count]);
            advance_index(state, count);
        }
        Load { x } => {
            let count = usize::from(x) + 1;
            let mut loaded = [0; 16];
            loaded[..count].copy_from_slice(state.read(state.i, count)?);
            state.v[..count].copy_from_slice(&loaded[..count]);
            advance_index(state, count);
        }
        StoreRpl { x } => {
            let count = rpl_count(x);
            let v = state.v;
            state.rpl[..count].copy_from_slice(&v[..count]);
        }
        LoadRpl { x } => {
            let count = rpl_count(x);
            let rpl = state.rpl;
            state.v[..count].copy_from_slice(&rpl[..count]);
        }

        Draw { x, y, n } => {
            let (vx, vy) = (state.reg(x), state.reg(y));
            let dots = state.quirks.lores_as_dots;
            let mut sprite = [0; 15];
            let rows = usize::from(n);
            sprite[..rows].copy_from_slice(state.read(state.i, rows)?);
            let collision = state.display.draw_sprite(vx, vy, &sprite[..rows], dots);
            state.v[VF] = collision as u8;
        }
        DrawLarge { x, y } => {
            if state.display.resolution() != Resolution::High {
                return Ok(());
            }
            let (vx, vy) = (state.reg(x), state.reg(y));
            let mut sprite = [0; 32];
            sprite.copy_from_slice(state.read(state.i, 32)?);
            let collision = state.display.draw_large_sprite(vx, vy, &sprite);
            state.v[VF] = collision as u8;
        }

        SkipKey { x } => state.skip_if(state.is_key_down(state.reg(x))),
        SkipNotKey { x } => state.skip_if(!state.is_key_down(state.reg(x))),
        LoadDelay { x } => state.set_reg(x, state.delay_timer),
        SetDelay { x } => state.delay_timer = state.reg(x),
        SetSound { x } => state.sound_timer = state.reg(x),
        WaitKey { x } => match state.first_pressed_key() {
            Some(key) => state.set_reg(x, key),
            // repeat this instruction until a key is down
            None => state.pc -= 2,
        },

        // colour and port hardware is not modelled
        StepBackground
        | ColorRegion { .. }
        | SkipKey2 { .. }
        | SkipNotKey2 { .. }
        | ShowHex { .. }
        | PortOut { .. }
        | PortIn { .. } => {}
    }
    Ok(())
}

fn shift_source(state: &State, x: u8, y: u8) -> u8 {
    if state.quirks.shift_uses_vy {
        state.reg(y)
    } else {
        state.reg(x)
    }
}

fn advance_index(state: &mut State, count: usize) {
    if state.quirks.bulk_transfer_advances_index {
        state.i = state.i.wrapping_add(count as u16);
    }
}

fn rpl_count(x: u8) -> usize {
    let count = usize::from(x) + 1;
    if count > RPL_FLAG_COUNT {
        warn!("RPL transfer through V{:X} clamped to V7", x);
        return RPL_FLAG_COUNT;
    }
    count
}
