//! Static part catalog.
//!
//! Maps a part type name (as the front end spells it, e.g. `"555 Timer"`)
//! to its category and pin layout. Breadboards are the one part with a
//! dynamically sized pin set; see [`breadboard_pins`].

use serde::{Deserialize, Serialize};

/// Part category, as shown in the component palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Mcu,
    Gate,
    Sensor,
    Input,
    Output,
    Display,
    Tool,
}

/// Electrical role of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    In,
    Out,
    Power,
    Ground,
    Analog,
    /// Bidirectional microcontroller GPIO
    Digital,
    /// Passive contact (breadboard holes)
    Io,
}

/// A pin as declared in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub direction: PinDirection,
}

/// An owned pin description, used where pin sets are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub id: String,
    pub label: String,
    pub direction: PinDirection,
}

impl From<&PinSpec> for Pin {
    fn from(spec: &PinSpec) -> Self {
        Self {
            id: spec.id.to_string(),
            label: spec.label.to_string(),
            direction: spec.direction,
        }
    }
}

/// Every part type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartType {
    ArduinoUno,
    Esp32,
    RaspberryPiPico,
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Timer555,
    Photoresistor,
    Ultrasonic,
    PirSensor,
    ToggleSwitch,
    PushButton,
    Potentiometer,
    LedLamp,
    RgbLed,
    ServoMotor,
    SevenSegment,
    Oscilloscope,
    Multimeter,
    Breadboard,
}

impl PartType {
    /// All catalog entries, in palette order.
    pub const ALL: [PartType; 23] = [
        Self::ArduinoUno,
        Self::Esp32,
        Self::RaspberryPiPico,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Nand,
        Self::Nor,
        Self::Xor,
        Self::Timer555,
        Self::Photoresistor,
        Self::Ultrasonic,
        Self::PirSensor,
        Self::ToggleSwitch,
        Self::PushButton,
        Self::Potentiometer,
        Self::LedLamp,
        Self::RgbLed,
        Self::ServoMotor,
        Self::SevenSegment,
        Self::Oscilloscope,
        Self::Multimeter,
        Self::Breadboard,
    ];

    /// Look up a part by its catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name.trim())
    }

    /// The catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArduinoUno => "Arduino Uno",
            Self::Esp32 => "ESP32",
            Self::RaspberryPiPico => "Raspberry Pi Pico",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Timer555 => "555 Timer",
            Self::Photoresistor => "Photoresistor",
            Self::Ultrasonic => "Ultrasonic",
            Self::PirSensor => "PIR Sensor",
            Self::ToggleSwitch => "Toggle Switch",
            Self::PushButton => "Push Button",
            Self::Potentiometer => "Potentiometer",
            Self::LedLamp => "LED Lamp",
            Self::RgbLed => "RGB LED",
            Self::ServoMotor => "Servo Motor",
            Self::SevenSegment => "7-Segment",
            Self::Oscilloscope => "Oscilloscope",
            Self::Multimeter => "Multimeter",
            Self::Breadboard => "Breadboard",
        }
    }

    /// The palette category.
    pub fn category(&self) -> Category {
        match self {
            Self::ArduinoUno | Self::Esp32 | Self::RaspberryPiPico => Category::Mcu,
            Self::And | Self::Or | Self::Not | Self::Nand | Self::Nor | Self::Xor => Category::Gate,
            // The timer sits in the gate palette
            Self::Timer555 => Category::Gate,
            Self::Photoresistor | Self::Ultrasonic | Self::PirSensor => Category::Sensor,
            Self::ToggleSwitch | Self::PushButton | Self::Potentiometer => Category::Input,
            Self::LedLamp | Self::RgbLed | Self::ServoMotor => Category::Output,
            Self::SevenSegment => Category::Display,
            Self::Oscilloscope | Self::Multimeter | Self::Breadboard => Category::Tool,
        }
    }

    /// The static pin table. Empty for breadboards, whose pins depend on
    /// the row count.
    pub fn pins(&self) -> &'static [PinSpec] {
        match self {
            Self::ArduinoUno => ARDUINO_UNO_PINS,
            Self::Esp32 => ESP32_PINS,
            Self::RaspberryPiPico => PICO_PINS,
            Self::Not => UNARY_GATE_PINS,
            Self::And | Self::Or | Self::Nand | Self::Nor | Self::Xor => BINARY_GATE_PINS,
            Self::Timer555 => TIMER_555_PINS,
            Self::Photoresistor => PHOTORESISTOR_PINS,
            Self::Ultrasonic => ULTRASONIC_PINS,
            Self::PirSensor => PIR_PINS,
            Self::ToggleSwitch | Self::PushButton => SINGLE_OUTPUT_PINS,
            Self::Potentiometer => POTENTIOMETER_PINS,
            Self::LedLamp => LED_PINS,
            Self::RgbLed => RGB_LED_PINS,
            Self::ServoMotor => SERVO_PINS,
            Self::SevenSegment => SEVEN_SEGMENT_PINS,
            Self::Oscilloscope => OSCILLOSCOPE_PINS,
            Self::Multimeter => MULTIMETER_PINS,
            Self::Breadboard => &[],
        }
    }

    /// Find a pin in the static table.
    pub fn pin(&self, id: &str) -> Option<&'static PinSpec> {
        self.pins().iter().find(|p| p.id == id)
    }

    /// The sketch a freshly placed microcontroller starts with.
    pub fn default_code(&self) -> Option<&'static str> {
        match self {
            Self::ArduinoUno => Some(ARDUINO_BLINK),
            Self::Esp32 => Some(ESP32_BLINK),
            Self::RaspberryPiPico => Some(PICO_BLINK),
            _ => None,
        }
    }
}

/// Default breadboard row count.
pub const DEFAULT_BREADBOARD_ROWS: usize = 30;

/// Largest breadboard a board file may declare.
pub const MAX_BREADBOARD_ROWS: usize = 1_000;

/// Pins of a breadboard with `rows` rows: `L1..Ln` then `R1..Rn`.
pub fn breadboard_pins(rows: usize) -> Vec<Pin> {
    ["L", "R"]
        .iter()
        .flat_map(|prefix| {
            (1..=rows).map(move |i| Pin {
                id: format!("{}{}", prefix, i),
                label: i.to_string(),
                direction: PinDirection::Io,
            })
        })
        .collect()
}

const fn pin(id: &'static str, label: &'static str, direction: PinDirection) -> PinSpec {
    PinSpec { id, label, direction }
}

use PinDirection::{Analog, Digital, Ground, In, Out, Power};

const ARDUINO_UNO_PINS: &[PinSpec] = &[
    pin("RESET", "RESET", In),
    pin("3V3", "3.3V", Power),
    pin("5V", "5V", Power),
    pin("GND1", "GND", Ground),
    pin("GND2", "GND", Ground),
    pin("VIN", "VIN", Power),
    pin("A0", "A0", Analog),
    pin("A1", "A1", Analog),
    pin("A2", "A2", Analog),
    pin("A3", "A3", Analog),
    pin("A4", "A4", Analog),
    pin("A5", "A5", Analog),
    pin("0", "RX/0", Digital),
    pin("1", "TX/1", Digital),
    pin("2", "D2", Digital),
    pin("3", "D3~", Digital),
    pin("4", "D4", Digital),
    pin("5", "D5~", Digital),
    pin("6", "D6~", Digital),
    pin("7", "D7", Digital),
    pin("8", "D8", Digital),
    pin("9", "D9~", Digital),
    pin("10", "D10~", Digital),
    pin("11", "D11~", Digital),
    pin("12", "D12", Digital),
    pin("13", "D13", Digital),
    pin("GND3", "GND", Ground),
    pin("AREF", "AREF", In),
];

const ESP32_PINS: &[PinSpec] = &[
    pin("EN", "EN", In),
    pin("VP", "VP", In),
    pin("VN", "VN", In),
    pin("34", "D34", Digital),
    pin("35", "D35", Digital),
    pin("32", "D32", Digital),
    pin("33", "D33", Digital),
    pin("25", "D25", Digital),
    pin("26", "D26", Digital),
    pin("27", "D27", Digital),
    pin("14", "D14", Digital),
    pin("12", "D12", Digital),
    pin("13", "D13", Digital),
    pin("GND1", "GND", Ground),
    pin("VIN", "VIN", Power),
    pin("23", "D23", Digital),
    pin("22", "D22", Digital),
    pin("1", "TX0", Digital),
    pin("3", "RX0", Digital),
    pin("21", "D21", Digital),
    pin("19", "D19", Digital),
    pin("18", "D18", Digital),
    pin("5", "D5", Digital),
    pin("17", "D17", Digital),
    pin("16", "D16", Digital),
    pin("4", "D4", Digital),
    pin("0", "D0", Digital),
    pin("2", "D2", Digital),
    pin("15", "D15", Digital),
    pin("3V3", "3V3", Power),
];

const PICO_PINS: &[PinSpec] = &[
    pin("0", "GP0", Digital),
    pin("1", "GP1", Digital),
    pin("GND1", "GND", Ground),
    pin("2", "GP2", Digital),
    pin("3", "GP3", Digital),
    pin("4", "GP4", Digital),
    pin("5", "GP5", Digital),
    pin("GND2", "GND", Ground),
    pin("6", "GP6", Digital),
    pin("7", "GP7", Digital),
    pin("8", "GP8", Digital),
    pin("9", "GP9", Digital),
    pin("GND3", "GND", Ground),
    pin("10", "GP10", Digital),
    pin("11", "GP11", Digital),
    pin("12", "GP12", Digital),
    pin("13", "GP13", Digital),
    pin("GND4", "GND", Ground),
    pin("14", "GP14", Digital),
    pin("15", "GP15", Digital),
    pin("VBUS", "VBUS", Power),
    pin("VSYS", "VSYS", Power),
    pin("GND5", "GND", Ground),
    pin("3V3_EN", "3V3_EN", In),
    pin("3V3", "3V3(OUT)", Power),
    pin("ADC_REF", "ADC_REF", In),
    pin("28", "GP28", Digital),
    pin("GND6", "GND", Ground),
    pin("27", "GP27", Digital),
    pin("26", "GP26", Digital),
    pin("RUN", "RUN", In),
    pin("22", "GP22", Digital),
    pin("GND7", "GND", Ground),
    pin("21", "GP21", Digital),
    pin("20", "GP20", Digital),
    pin("19", "GP19", Digital),
    pin("18", "GP18", Digital),
    pin("GND8", "GND", Ground),
    pin("17", "GP17", Digital),
    pin("16", "GP16", Digital),
];

const BINARY_GATE_PINS: &[PinSpec] = &[pin("A", "A", In), pin("B", "B", In), pin("OUT", "OUT", Out)];

const UNARY_GATE_PINS: &[PinSpec] = &[pin("IN", "IN", In), pin("OUT", "OUT", Out)];

const TIMER_555_PINS: &[PinSpec] = &[
    pin("1", "GND", Ground),
    pin("2", "TRIG", In),
    pin("3", "OUT", Out),
    pin("4", "RESET", In),
    pin("8", "VCC", Power),
    pin("7", "DISCH", In),
    pin("6", "THRES", In),
    pin("5", "CTRL", In),
];

const PHOTORESISTOR_PINS: &[PinSpec] = &[
    pin("VCC", "VCC", Power),
    pin("GND", "GND", Ground),
    pin("OUT", "OUT", Analog),
];

const ULTRASONIC_PINS: &[PinSpec] = &[
    pin("TRIG", "TRIG", In),
    pin("ECHO", "ECHO", Out),
    pin("VCC", "VCC", Power),
    pin("GND", "GND", Ground),
];

const PIR_PINS: &[PinSpec] = &[
    pin("VCC", "VCC", Power),
    pin("GND", "GND", Ground),
    pin("OUT", "OUT", Out),
];

const SINGLE_OUTPUT_PINS: &[PinSpec] = &[pin("OUT", "OUT", Out)];

const POTENTIOMETER_PINS: &[PinSpec] = &[
    pin("VCC", "VCC", Power),
    pin("GND", "GND", Ground),
    pin("OUT", "OUT", Analog),
];

const LED_PINS: &[PinSpec] = &[pin("IN", "IN", In)];

const RGB_LED_PINS: &[PinSpec] = &[
    pin("RED", "R", In),
    pin("GRN", "G", In),
    pin("BLU", "B", In),
    pin("GND", "CAT", Ground),
];

const SERVO_PINS: &[PinSpec] = &[
    pin("SIG", "SIG", In),
    pin("VCC", "VCC", Power),
    pin("GND", "GND", Ground),
];

const SEVEN_SEGMENT_PINS: &[PinSpec] = &[
    pin("A", "A", In),
    pin("B", "B", In),
    pin("C", "C", In),
    pin("D", "D", In),
    pin("E", "E", In),
    pin("F", "F", In),
    pin("G", "G", In),
    pin("DP", "DP", In),
];

const OSCILLOSCOPE_PINS: &[PinSpec] = &[pin("IN", "CH1", In), pin("GND", "GND", Ground)];

const MULTIMETER_PINS: &[PinSpec] = &[pin("V+", "V+", In), pin("V-", "V-", Ground)];

const ARDUINO_BLINK: &str = "// Arduino Setup
void setup() {
  pinMode(13, OUTPUT);
}

void loop() {
  digitalWrite(13, HIGH);
  delay(1000);
  digitalWrite(13, LOW);
  delay(1000);
}";

const ESP32_BLINK: &str = "// ESP32 Setup
void setup() {
  pinMode(2, OUTPUT);
}

void loop() {
  digitalWrite(2, HIGH);
  delay(500);
  digitalWrite(2, LOW);
  delay(500);
}";

// MicroPython has no setup/loop blocks, so this sketch is inert.
const PICO_BLINK: &str = "// Pico Setup
import machine
import time
led = machine.Pin(25, machine.Pin.OUT)
while True:
  led.toggle()
  time.sleep(0.5)";
