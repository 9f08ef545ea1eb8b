//! A small MIPS interpreter covering the instructions the code generator
//! emits, so compiled programs can be run inside the test suite.

use std::collections::{HashMap, VecDeque};

use cflat::compiler::emitter::{AsmLine, Assembly};

const DATA_START: i32 = 0x1001_0000;
const STACK_START: i32 = 0x7fff_effc;
const STEP_LIMIT: usize = 1_000_000;

struct Instruction {
    opcode: &'static str,
    operands: Vec<String>,
}

pub struct Machine {
    program: Vec<Instruction>,
    text_labels: HashMap<String, usize>,
    data_labels: HashMap<String, i32>,
    strings: HashMap<i32, String>,
    registers: HashMap<String, i32>,
    memory: HashMap<i32, i32>,
    input: VecDeque<i32>,
    output: String,
}

impl Machine {
    pub fn load(assembly: &Assembly) -> Self {
        let mut machine = Machine {
            program: vec![],
            text_labels: HashMap::new(),
            data_labels: HashMap::new(),
            strings: HashMap::new(),
            registers: HashMap::new(),
            memory: HashMap::new(),
            input: VecDeque::new(),
            output: String::new(),
        };

        let mut next_data = DATA_START;
        for line in assembly.lines() {
            match line {
                AsmLine::Label(label) => {
                    machine.text_labels.insert(label.clone(), machine.program.len());
                }
                AsmLine::Data { label, directive } => {
                    machine.data_labels.insert(label.clone(), next_data);
                    let size = if let Some(size) = directive.strip_prefix(".space ") {
                        size.trim().parse::<i32>().expect("bad .space size")
                    } else if let Some(literal) = directive.strip_prefix(".asciiz ") {
                        let text = unescape(literal.trim());
                        let size = text.len() as i32 + 1;
                        machine.strings.insert(next_data, text);
                        size
                    } else {
                        panic!("unsupported data directive {}", directive);
                    };
                    next_data += (size + 3) / 4 * 4;
                }
                AsmLine::Instruction {
                    opcode, operands, ..
                } => machine.program.push(Instruction {
                    opcode,
                    operands: operands.clone(),
                }),
                AsmLine::Directive(_) | AsmLine::Comment(_) => {}
            }
        }

        machine.set("$sp", STACK_START);
        machine.set("$fp", STACK_START);
        machine
    }

    /// Runs from `main` until the exit syscall and returns everything the
    /// program printed.
    pub fn run(mut self, input: &[i32]) -> String {
        self.input = input.iter().copied().collect();
        let mut pc = *self.text_labels.get("main").expect("no main label");

        for _ in 0..STEP_LIMIT {
            let instruction = self.program.get(pc).expect("ran off the end of the program");
            let opcode = instruction.opcode;
            let ops = instruction.operands.clone();
            let mut next = pc + 1;

            match opcode {
                "li" => {
                    let value = immediate(&ops[1]);
                    self.set(&ops[0], value);
                }
                "la" => {
                    let address = self.address(&ops[1]);
                    self.set(&ops[0], address);
                }
                "lw" => {
                    let address = self.address(&ops[1]);
                    let value = self.load_word(address);
                    self.set(&ops[0], value);
                }
                "sw" => {
                    let address = self.address(&ops[1]);
                    let value = self.get(&ops[0]);
                    self.memory.insert(address, value);
                }
                "move" => {
                    let value = self.get(&ops[1]);
                    self.set(&ops[0], value);
                }
                "addu" | "add" | "addi" => {
                    let value = self.get(&ops[1]).wrapping_add(self.value(&ops[2]));
                    self.set(&ops[0], value);
                }
                "subu" | "sub" => {
                    let value = self.get(&ops[1]).wrapping_sub(self.value(&ops[2]));
                    self.set(&ops[0], value);
                }
                "mul" => {
                    let value = self.get(&ops[1]).wrapping_mul(self.value(&ops[2]));
                    self.set(&ops[0], value);
                }
                "div" => {
                    let divisor = self.value(&ops[2]);
                    assert_ne!(divisor, 0, "division by zero");
                    let value = self.get(&ops[1]).wrapping_div(divisor);
                    self.set(&ops[0], value);
                }
                "xori" => {
                    let value = self.get(&ops[1]) ^ self.value(&ops[2]);
                    self.set(&ops[0], value);
                }
                "seq" | "sne" | "slt" | "sgt" | "sle" | "sge" => {
                    let (a, b) = (self.get(&ops[1]), self.value(&ops[2]));
                    let result = match opcode {
                        "seq" => a == b,
                        "sne" => a != b,
                        "slt" => a < b,
                        "sgt" => a > b,
                        "sle" => a <= b,
                        _ => a >= b,
                    };
                    self.set(&ops[0], result as i32);
                }
                "b" => next = self.target(&ops[0]),
                "beq" => {
                    if self.get(&ops[0]) == self.get(&ops[1]) {
                        next = self.target(&ops[2]);
                    }
                }
                "bne" => {
                    if self.get(&ops[0]) != self.get(&ops[1]) {
                        next = self.target(&ops[2]);
                    }
                }
                "blez" => {
                    if self.get(&ops[0]) <= 0 {
                        next = self.target(&ops[1]);
                    }
                }
                "jal" => {
                    self.set("$ra", next as i32);
                    next = self.target(&ops[0]);
                }
                "jr" => next = self.get(&ops[0]) as usize,
                "syscall" => match self.get("$v0") {
                    1 => {
                        let value = self.get("$a0");
                        self.output.push_str(&value.to_string());
                    }
                    4 => {
                        let address = self.get("$a0");
                        let text = self.strings.get(&address).expect("print of a non-string");
                        self.output.push_str(text);
                    }
                    5 => {
                        let value = self.input.pop_front().expect("program read past its input");
                        self.set("$v0", value);
                    }
                    10 => return self.output,
                    other => panic!("unsupported syscall {}", other),
                },
                other => panic!("unsupported instruction {}", other),
            }

            pc = next;
        }

        panic!("program did not exit within {} steps", STEP_LIMIT);
    }

    fn get(&self, register: &str) -> i32 {
        if register == "$zero" {
            return 0;
        }
        *self.registers.get(register).unwrap_or(&0)
    }

    fn set(&mut self, register: &str, value: i32) {
        assert!(register.starts_with('$'), "not a register: {}", register);
        self.registers.insert(register.to_string(), value);
    }

    /// A register or an immediate.
    fn value(&self, operand: &str) -> i32 {
        if operand.starts_with('$') {
            self.get(operand)
        } else {
            immediate(operand)
        }
    }

    /// `offset($reg)` or a data label.
    fn address(&self, operand: &str) -> i32 {
        match operand.find('(') {
            Some(open) => {
                let offset = immediate(&operand[..open]);
                let register = &operand[open + 1..operand.len() - 1];
                self.get(register).wrapping_add(offset)
            }
            None => *self
                .data_labels
                .get(operand)
                .unwrap_or_else(|| panic!("unknown data label {}", operand)),
        }
    }

    fn load_word(&self, address: i32) -> i32 {
        assert_eq!(address % 4, 0, "unaligned load at {:#x}", address);
        *self.memory.get(&address).unwrap_or(&0)
    }

    fn target(&self, label: &str) -> usize {
        *self
            .text_labels
            .get(label)
            .unwrap_or_else(|| panic!("unknown text label {}", label))
    }
}

fn immediate(operand: &str) -> i32 {
    operand
        .parse()
        .unwrap_or_else(|_| panic!("bad immediate {}", operand))
}

/// Strips the quotes from a string literal and resolves its escapes.
fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut text = String::new();
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some(other) => text.push(other),
            None => panic!("dangling escape in {}", literal),
        }
    }

    text
}
