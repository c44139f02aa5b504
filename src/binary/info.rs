// Thu Oct 15 2026 - Alex

use goblin::mach::Mach;
use goblin::Object;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PE_MACHINE_I386: u16 = 0x014c;
const PE_MACHINE_AMD64: u16 = 0x8664;
const PE_MACHINE_ARM: u16 = 0x01c0;
const PE_MACHINE_ARMNT: u16 = 0x01c4;
const PE_MACHINE_ARM64: u16 = 0xaa64;

const ELF_MACHINE_386: u16 = 3;
const ELF_MACHINE_ARM: u16 = 40;
const ELF_MACHINE_X86_64: u16 = 62;
const ELF_MACHINE_AARCH64: u16 = 183;

const MACH_CPU_X86: u32 = 7;
const MACH_CPU_X86_64: u32 = 0x0100_0007;
const MACH_CPU_ARM: u32 = 12;
const MACH_CPU_ARM64: u32 = 0x0100_000c;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetType {
    PeDll,
    PeExe,
    Elf,
    MachO,
    Archive,
    Unknown,
}

impl TargetType {
    pub fn name(&self) -> &'static str {
        match self {
            TargetType::PeDll => "pe-dll",
            TargetType::PeExe => "pe-exe",
            TargetType::Elf => "elf",
            TargetType::MachO => "mach-o",
            TargetType::Archive => "archive",
            TargetType::Unknown => "unknown",
        }
    }
}

/// What is known about the analyzed file itself, independent of its exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryInfo {
    pub path: Option<PathBuf>,
    pub name: String,
    pub target_type: TargetType,
    pub architecture: String,
    pub is_64: bool,
    pub file_size: u64,
    pub is_signed: bool,
    pub publisher: Option<String>,
    pub is_known_system_binary: bool,
}

impl BinaryInfo {
    pub fn unknown(name: &str) -> Self {
        Self {
            path: None,
            name: name.to_string(),
            target_type: TargetType::Unknown,
            architecture: "unknown".to_string(),
            is_64: false,
            file_size: 0,
            is_signed: false,
            publisher: None,
            is_known_system_binary: false,
        }
    }

    /// Classifies the file with goblin. Never fails; unreadable or unparsable
    /// files come back as `Unknown`.
    pub fn inspect(path: &Path, known_system: &[String]) -> Self {
        let name = file_name(path);
        let mut info = Self::unknown(&name);
        info.path = Some(path.to_path_buf());
        info.is_known_system_binary = is_known_system(path, known_system);

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Cannot read {} for metadata: {}", path.display(), e);
                return info;
            }
        };
        info.file_size = bytes.len() as u64;

        match Object::parse(&bytes) {
            Ok(Object::PE(pe)) => {
                info.target_type = if pe.is_lib { TargetType::PeDll } else { TargetType::PeExe };
                info.is_64 = pe.is_64;
                info.architecture = pe_architecture(pe.header.coff_header.machine).to_string();
                info.is_signed = pe
                    .header
                    .optional_header
                    .as_ref()
                    .and_then(|oh| oh.data_directories.get_certificate_table().as_ref().map(|d| d.size > 0))
                    .unwrap_or(false);
            }
            Ok(Object::Elf(elf)) => {
                info.target_type = TargetType::Elf;
                info.is_64 = elf.is_64;
                info.architecture = elf_architecture(elf.header.e_machine).to_string();
            }
            Ok(Object::Mach(Mach::Binary(macho))) => {
                info.target_type = TargetType::MachO;
                info.is_64 = macho.is_64;
                info.architecture = mach_architecture(macho.header.cputype).to_string();
            }
            Ok(Object::Mach(Mach::Fat(_))) => {
                info.target_type = TargetType::MachO;
                info.architecture = "universal".to_string();
            }
            Ok(Object::Archive(_)) => {
                info.target_type = TargetType::Archive;
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("goblin could not classify {}: {}", path.display(), e);
            }
        }

        info
    }

    /// Metadata for a run driven by a pre-captured dump with no binary.
    pub fn from_dump(dump_path: &Path) -> Self {
        let mut info = Self::unknown(&file_name(dump_path));
        info.file_size = fs::metadata(dump_path).map(|m| m.len()).unwrap_or(0);
        info
    }

    pub fn stem(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "analysis".to_string())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| "analysis".to_string())
}

fn is_known_system(path: &Path, known_system: &[String]) -> bool {
    let name = file_name(path).to_lowercase();
    if known_system.iter().any(|k| k.to_lowercase() == name) {
        return true;
    }
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(|dir| {
            let dir = dir.to_lowercase();
            dir == "system32" || dir == "syswow64"
        })
        .unwrap_or(false)
}

fn pe_architecture(machine: u16) -> &'static str {
    match machine {
        PE_MACHINE_I386 => "x86",
        PE_MACHINE_AMD64 => "x64",
        PE_MACHINE_ARM | PE_MACHINE_ARMNT => "arm",
        PE_MACHINE_ARM64 => "arm64",
        _ => "unknown",
    }
}

fn elf_architecture(machine: u16) -> &'static str {
    match machine {
        ELF_MACHINE_386 => "x86",
        ELF_MACHINE_X86_64 => "x64",
        ELF_MACHINE_ARM => "arm",
        ELF_MACHINE_AARCH64 => "arm64",
        _ => "unknown",
    }
}

fn mach_architecture(cputype: u32) -> &'static str {
    match cputype {
        MACH_CPU_X86 => "x86",
        MACH_CPU_X86_64 => "x64",
        MACH_CPU_ARM => "arm",
        MACH_CPU_ARM64 => "arm64",
        _ => "unknown",
    }
}
