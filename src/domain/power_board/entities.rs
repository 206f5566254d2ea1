use serde::{Deserialize, Serialize};
use std::fmt;

/// 現在の設定をフラッシュに書き込むために `CFG_WRITE` へ渡す値
pub const CFG_WRITE_MAGIC: u32 = 0x46;

/// このツールが扱う LiFePO4wered ボードのレジスタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Register {
    AutoBoot,
    AutoShdnTime,
    VinThreshold,
    VbatBoot,
    PiBootTo,
    PiShdnTo,
    CfgWrite,
    Vin,
    Vout,
    Vbat,
    Iout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterUnit {
    None,
    Millivolts,
    Milliamps,
    Minutes,
    Seconds,
}

impl RegisterUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            RegisterUnit::None => "",
            RegisterUnit::Millivolts => "mV",
            RegisterUnit::Milliamps => "mA",
            RegisterUnit::Minutes => "min",
            RegisterUnit::Seconds => "s",
        }
    }
}

impl Register {
    /// ダンプで出力するレジスタ（出力順）
    pub const DUMPABLE: [Register; 10] = [
        Register::AutoBoot,
        Register::AutoShdnTime,
        Register::VinThreshold,
        Register::VbatBoot,
        Register::PiBootTo,
        Register::PiShdnTo,
        Register::Vin,
        Register::Vout,
        Register::Vbat,
        Register::Iout,
    ];

    /// `lifepo4wered-cli` が受け付けるレジスタ名
    pub fn name(&self) -> &'static str {
        match self {
            Register::AutoBoot => "AUTO_BOOT",
            Register::AutoShdnTime => "AUTO_SHDN_TIME",
            Register::VinThreshold => "VIN_THRESHOLD",
            Register::VbatBoot => "VBAT_BOOT",
            Register::PiBootTo => "PI_BOOT_TO",
            Register::PiShdnTo => "PI_SHDN_TO",
            Register::CfgWrite => "CFG_WRITE",
            Register::Vin => "VIN",
            Register::Vout => "VOUT",
            Register::Vbat => "VBAT",
            Register::Iout => "IOUT",
        }
    }

    pub fn unit(&self) -> RegisterUnit {
        match self {
            Register::VinThreshold
            | Register::VbatBoot
            | Register::Vin
            | Register::Vout
            | Register::Vbat => RegisterUnit::Millivolts,
            Register::Iout => RegisterUnit::Milliamps,
            Register::AutoShdnTime => RegisterUnit::Minutes,
            Register::PiBootTo | Register::PiShdnTo => RegisterUnit::Seconds,
            Register::AutoBoot | Register::CfgWrite => RegisterUnit::None,
        }
    }

    /// テレメトリレジスタは書き込み不可
    pub fn is_telemetry(&self) -> bool {
        matches!(
            self,
            Register::Vin | Register::Vout | Register::Vbat | Register::Iout
        )
    }

    pub fn is_writable(&self) -> bool {
        !self.is_telemetry()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value written to a register, keeping the radix it is passed to the CLI in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterValue {
    Decimal(u32),
    Hex(u32),
}

impl RegisterValue {
    pub fn raw(&self) -> u32 {
        match self {
            RegisterValue::Decimal(v) | RegisterValue::Hex(v) => *v,
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterValue::Decimal(v) => write!(f, "{v}"),
            RegisterValue::Hex(v) => write!(f, "{v:#04x}"),
        }
    }
}

/// `get` の結果（CLI が出力した文字列のまま保持）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterReading {
    pub register: Register,
    pub value: String,
}

impl RegisterReading {
    pub fn new(register: Register, value: impl Into<String>) -> Self {
        Self {
            register,
            value: value.into(),
        }
    }
}

impl fmt::Display for RegisterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.register.unit().suffix();
        if suffix.is_empty() {
            write!(f, "{} = {}", self.register, self.value)
        } else {
            write!(f, "{} = {} {}", self.register, self.value, suffix)
        }
    }
}

/// `lp4w set` で適用するボード設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerPolicy {
    /// Boot when power is applied (3 = boot on VIN regardless of battery state).
    pub auto_boot: u32,
    /// バッテリー駆動に切り替わってから自動シャットダウンするまでの分数
    pub auto_shdn_time: u32,
    /// Input voltage in mV above which external power is considered present.
    pub vin_threshold: u32,
    /// 設定をフラッシュに保存するか
    pub persist: bool,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self {
            auto_boot: 3,
            auto_shdn_time: 3,
            vin_threshold: 4500,
            persist: false,
        }
    }
}

impl PowerPolicy {
    /// 発行すべき順序で並べたレジスタ書き込み
    pub fn writes(&self) -> Vec<(Register, RegisterValue)> {
        let mut writes = vec![
            (Register::AutoBoot, RegisterValue::Decimal(self.auto_boot)),
            (
                Register::AutoShdnTime,
                RegisterValue::Decimal(self.auto_shdn_time),
            ),
            (
                Register::VinThreshold,
                RegisterValue::Decimal(self.vin_threshold),
            ),
        ];
        if self.persist {
            writes.push((Register::CfgWrite, RegisterValue::Hex(CFG_WRITE_MAGIC)));
        }
        writes
    }
}
