use std::fmt;

use super::config::Variant;

/// One decoded instruction word with its operand fields pulled out.
///
/// `x`/`y` are register numbers, `kk` an 8-bit immediate, `n` a 4-bit
/// immediate and `nnn` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,                         // 00E0
    Return,                              // 00EE
    ScrollUp(u8),                        // 00BN
    ScrollDown(u8),                      // 00CN
    ToggleIndexQuirk,                    // 00FA
    ScrollRight,                         // 00FB
    ScrollLeft,                          // 00FC
    Exit,                                // 00FD
    LowRes,                              // 00FE
    HighRes,                             // 00FF
    StepBackground,                      // 02A0 (8X)
    Jump(u16),                           // 1NNN
    Call(u16),                           // 2NNN
    SkipEqImm { x: u8, kk: u8 },         // 3XKK
    SkipNeImm { x: u8, kk: u8 },         // 4XKK
    SkipEq { x: u8, y: u8 },             // 5XY0
    AddColor { x: u8, y: u8 },           // 5XY1 (8X)
    SkipGt { x: u8, y: u8 },             // 5XY1 (8E)
    SkipLt { x: u8, y: u8 },             // 5XY2 (8E)
    SkipNe { x: u8, y: u8 },             // 9XY0, 5XY3 (8E)
    LoadImm { x: u8, kk: u8 },           // 6XKK
    AddImm { x: u8, kk: u8 },            // 7XKK
    Copy { x: u8, y: u8 },               // 8XY0
    Or { x: u8, y: u8 },                 // 8XY1
    And { x: u8, y: u8 },                // 8XY2
    Xor { x: u8, y: u8 },                // 8XY3
    Add { x: u8, y: u8 },                // 8XY4
    Sub { x: u8, y: u8 },                // 8XY5
    ShiftRight { x: u8, y: u8 },         // 8XY6
    SubReverse { x: u8, y: u8 },         // 8XY7
    ShiftLeft { x: u8, y: u8 },          // 8XYE
    Mul { x: u8, y: u8 },                // 9XY1 (8E)
    Div { x: u8, y: u8 },                // 9XY2 (8E)
    Bcd16 { x: u8, y: u8 },              // 9XY3 (8E)
    LoadIndex(u16),                      // ANNN
    JumpOffset(u16),                     // BNNN
    ColorRegion { x: u8, y: u8, n: u8 }, // BXYN (8X)
    Random { x: u8, kk: u8 },            // CXKK
    Draw { x: u8, y: u8, n: u8 },        // DXYN
    DrawLarge { x: u8, y: u8 },          // DXY0
    SkipKey { x: u8 },                   // EX9E
    SkipNotKey { x: u8 },                // EXA1
    SkipKey2 { x: u8 },                  // EXF2 (8X)
    SkipNotKey2 { x: u8 },               // EXF5 (8X)
    LoadDelay { x: u8 },                 // FX07
    WaitKey { x: u8 },                   // FX0A
    SetDelay { x: u8 },                  // FX15
    SetSound { x: u8 },                  // FX18
    AddIndex { x: u8 },                  // FX1E
    SmallFont { x: u8 },                 // FX29
    LargeFont { x: u8 },                 // FX30
    Bcd { x: u8 },                       // FX33
    Store { x: u8 },                     // FX55
    Load { x: u8 },                      // FX65
    StoreRpl { x: u8 },                  // FX75
    ShowHex { x: u8 },                   // FX75 (8E)
    LoadRpl { x: u8 },                   // FX85
    PortOut { x: u8 },                   // FXF8 (8X, 8E)
    PortIn { x: u8 },                    // FXFB (8X, 8E)
}

impl Instruction {
    /// Decode `word` under `variant`. `None` means no handler claims it.
    pub fn decode(word: u16, variant: Variant) -> Option<Self> {
        use Instruction::*;

        let op = (word >> 12) as u8;
        let x = ((word & 0xF00) >> 8) as u8;
        let y = ((word & 0xF0) >> 4) as u8;
        let n = (word & 0xF) as u8;
        let kk = (word & 0xFF) as u8;
        let nnn = word & 0xFFF;

        let chip8x = variant == Variant::Chip8X;
        let chip8e = variant == Variant::Chip8E;

        let instruction = match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, 0x0, 0xB, _) => ScrollUp(n),
            (0x0, 0x0, 0xC, _) => ScrollDown(n),
            (0x0, 0x0, 0xF, 0xA) => ToggleIndexQuirk,
            (0x0, 0x0, 0xF, 0xB) => ScrollRight,
            (0x0, 0x0, 0xF, 0xC) => ScrollLeft,
            (0x0, 0x0, 0xF, 0xD) => Exit,
            (0x0, 0x0, 0xF, 0xE) => LowRes,
            (0x0, 0x0, 0xF, 0xF) => HighRes,
            (0x0, 0x2, 0xA, 0x0) if chip8x => StepBackground,
            (0x1, ..) => Jump(nnn),
            (0x2, ..) => Call(nnn),
            (0x3, ..) => SkipEqImm { x, kk },
            (0x4, ..) => SkipNeImm { x, kk },
            (0x5, _, _, 0x0) => SkipEq { x, y },
            (0x5, _, _, 0x1) if chip8x => AddColor { x, y },
            (0x5, _, _, 0x1) if chip8e => SkipGt { x, y },
            (0x5, _, _, 0x2) if chip8e => SkipLt { x, y },
            (0x5, _, _, 0x3) if chip8e => SkipNe { x, y },
            (0x6, ..) => LoadImm { x, kk },
            (0x7, ..) => AddImm { x, kk },
            (0x8, _, _, 0x0) => Copy { x, y },
            (0x8, _, _, 0x1) => Or { x, y },
            (0x8, _, _, 0x2) => And { x, y },
            (0x8, _, _, 0x3) => Xor { x, y },
            (0x8, _, _, 0x4) => Add { x, y },
            (0x8, _, _, 0x5) => Sub { x, y },
            (0x8, _, _, 0x6) => ShiftRight { x, y },
            (0x8, _, _, 0x7) => SubReverse { x, y },
            (0x8, _, _, 0xE) => ShiftLeft { x, y },
            (0x9, _, _, 0x0) => SkipNe { x, y },
            (0x9, _, _, 0x1) if chip8e => Mul { x, y },
            (0x9, _, _, 0x2) if chip8e => Div { x, y },
            (0x9, _, _, 0x3) if chip8e => Bcd16 { x, y },
            (0xA, ..) => LoadIndex(nnn),
            (0xB, ..) if chip8x => ColorRegion { x, y, n },
            (0xB, ..) => JumpOffset(nnn),
            (0xC, ..) => Random { x, kk },
            (0xD, _, _, 0x0) => DrawLarge { x, y },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipKey { x },
            (0xE, _, 0xA, 0x1) => SkipNotKey { x },
            (0xE, _, 0xF, 0x2) if chip8x => SkipKey2 { x },
            (0xE, _, 0xF, 0x5) if chip8x => SkipNotKey2 { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => SmallFont { x },
            (0xF, _, 0x3, 0x0) => LargeFont { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => Store { x },
            (0xF, _, 0x6, 0x5) => Load { x },
            (0xF, _, 0x7, 0x5) if chip8e => ShowHex { x },
            (0xF, _, 0x7, 0x5) => StoreRpl { x },
            (0xF, _, 0x8, 0x5) => LoadRpl { x },
            (0xF, _, 0xF, 0x8) if chip8x || chip8e => PortOut { x },
            (0xF, _, 0xF, 0xB) if chip8x || chip8e => PortIn { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Whether executing this can change what the active surface shows.
    pub fn redraws(&self) -> bool {
        use Instruction::*;

        matches!(
            self,
            ClearScreen
                | ScrollUp(_)
                | ScrollDown(_)
                | ScrollRight
                | ScrollLeft
                | LowRes
                | HighRes
                | Draw { .. }
                | DrawLarge { .. }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            ScrollUp(n) => write!(f, "SCU {}", n),
            ScrollDown(n) => write!(f, "SCD {}", n),
            ToggleIndexQuirk => write!(f, "COMPAT"),
            ScrollRight => write!(f, "SCR"),
            ScrollLeft => write!(f, "SCL"),
            Exit => write!(f, "EXIT"),
            LowRes => write!(f, "LOW"),
            HighRes => write!(f, "HIGH"),
            StepBackground => write!(f, "STEPCOL"),
            Jump(nnn) => write!(f, "JP {:03X}", nnn),
            Call(nnn) => write!(f, "CALL {:03X}", nnn),
            SkipEqImm { x, kk } => write!(f, "SE V{:X}, {:02X}", x, kk),
            SkipNeImm { x, kk } => write!(f, "SNE V{:X}, {:02X}", x, kk),
            SkipEq { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            AddColor { x, y } => write!(f, "ADDC V{:X}, V{:X}", x, y),
            SkipGt { x, y } => write!(f, "SGT V{:X}, V{:X}", x, y),
            SkipLt { x, y } => write!(f, "SLT V{:X}, V{:X}", x, y),
            SkipNe { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadImm { x, kk } => write!(f, "LD V{:X}, {:02X}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:02X}", x, kk),
            Copy { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Mul { x, y } => write!(f, "MUL V{:X}, V{:X}", x, y),
            Div { x, y } => write!(f, "DIV V{:X}, V{:X}", x, y),
            Bcd16 { x, y } => write!(f, "BCD V{:X}, V{:X}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, {:03X}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, {:03X}", nnn),
            ColorRegion { x, y, n } => write!(f, "COL V{:X}, V{:X}, {}", x, y, n),
            Random { x, kk } => write!(f, "RND V{:X}, {:02X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            DrawLarge { x, y } => write!(f, "DRW V{:X}, V{:X}, 0", x, y),
            SkipKey { x } => write!(f, "SKP V{:X}", x),
            SkipNotKey { x } => write!(f, "SKNP V{:X}", x),
            SkipKey2 { x } => write!(f, "SKP2 V{:X}", x),
            SkipNotKey2 { x } => write!(f, "SKNP2 V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            SmallFont { x } => write!(f, "LD F, V{:X}", x),
            LargeFont { x } => write!(f, "LD HF, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Load { x } => write!(f, "LD V{:X}, [I]", x),
            StoreRpl { x } => write!(f, "LD R, V{:X}", x),
            ShowHex { x } => write!(f, "DISP V{:X}", x),
            LoadRpl { x } => write!(f, "LD V{:X}, R", x),
            PortOut { x } => write!(f, "OUT V{:X}", x),
            PortIn { x } => write!(f, "IN V{:X}", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00E0, ClearScreen)]
    #[case(0x00EE, Return)]
    #[case(0x00B3, ScrollUp(3))]
    #[case(0x00CF, ScrollDown(15))]
    #[case(0x00FA, ToggleIndexQuirk)]
    #[case(0x00FD, Exit)]
    #[case(0x00FF, HighRes)]
    #[case(0x1ABC, Jump(0xABC))]
    #[case(0x2345, Call(0x345))]
    #[case(0x3A7F, SkipEqImm { x: 0xA, kk: 0x7F })]
    #[case(0x5120, SkipEq { x: 1, y: 2 })]
    #[case(0x8AB4, Add { x: 0xA, y: 0xB })]
    #[case(0x812E, ShiftLeft { x: 1, y: 2 })]
    #[case(0x9010, SkipNe { x: 0, y: 1 })]
    #[case(0xB123, JumpOffset(0x123))]
    #[case(0xD125, Draw { x: 1, y: 2, n: 5 })]
    #[case(0xD120, DrawLarge { x: 1, y: 2 })]
    #[case(0xE39E, SkipKey { x: 3 })]
    #[case(0xF40A, WaitKey { x: 4 })]
    #[case(0xF530, LargeFont { x: 5 })]
    #[case(0xF775, StoreRpl { x: 7 })]
    fn decodes_superchip(#[case] word: u16, #[case] expected: Instruction) {
        assert_eq!(Instruction::decode(word, Variant::SuperChip), Some(expected));
    }

    #[rstest]
    #[case(0x0000)]
    #[case(0x0123)]
    #[case(0x02A0)]
    #[case(0x5121)]
    #[case(0x5124)]
    #[case(0x8128)]
    #[case(0x9011)]
    #[case(0xE3F2)]
    #[case(0xF0FB)]
    #[case(0xF0FF)]
    fn rejects_unknown_superchip(#[case] word: u16) {
        assert_eq!(Instruction::decode(word, Variant::SuperChip), None);
    }

    #[test]
    fn chip8x_overlays() {
        let v = Variant::Chip8X;
        assert_eq!(Instruction::decode(0x02A0, v), Some(StepBackground));
        assert_eq!(Instruction::decode(0x5121, v), Some(AddColor { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0xB120, v), Some(ColorRegion { x: 1, y: 2, n: 0 }));
        assert_eq!(Instruction::decode(0xB12A, v), Some(ColorRegion { x: 1, y: 2, n: 0xA }));
        assert_eq!(Instruction::decode(0xE3F2, v), Some(SkipKey2 { x: 3 }));
        assert_eq!(Instruction::decode(0xE3F5, v), Some(SkipNotKey2 { x: 3 }));
        assert_eq!(Instruction::decode(0xF2F8, v), Some(PortOut { x: 2 }));
        assert_eq!(Instruction::decode(0xF2FB, v), Some(PortIn { x: 2 }));
        assert_eq!(Instruction::decode(0x5122, v), None);
    }

    #[test]
    fn chip8e_overlays() {
        let v = Variant::Chip8E;
        assert_eq!(Instruction::decode(0x5121, v), Some(SkipGt { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x5122, v), Some(SkipLt { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x5123, v), Some(SkipNe { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x9121, v), Some(Mul { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x9122, v), Some(Div { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x9123, v), Some(Bcd16 { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0xF375, v), Some(ShowHex { x: 3 }));
        assert_eq!(Instruction::decode(0xB123, v), Some(JumpOffset(0x123)));
        assert_eq!(Instruction::decode(0x02A0, v), None);
    }

    #[test]
    fn redraw_classification() {
        assert!(ClearScreen.redraws());
        assert!(Draw { x: 0, y: 0, n: 1 }.redraws());
        assert!(HighRes.redraws());
        assert!(!Add { x: 0, y: 1 }.redraws());
        assert!(!WaitKey { x: 0 }.redraws());
    }

    #[test]
    fn mnemonics() {
        assert_eq!(ClearScreen.to_string(), "CLS");
        assert_eq!(Draw { x: 1, y: 0xA, n: 5 }.to_string(), "DRW V1, VA, 5");
        assert_eq!(LoadIndex(0x2EA).to_string(), "LD I, 2EA");
    }
}
