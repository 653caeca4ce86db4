//! Build descriptors listing the emitted sources.

use crate::artifact::Artifact;
use crate::render::{CommentStyle, cmake_var, preamble};
use msggen_core::{Interface, OutputConfig, Registry, Representation};
use std::path::PathBuf;

/// Renders CMake files for the host tree and `messages.cmake` for the embedded tree.
#[derive(Debug, Clone, Copy)]
pub struct BuildFileEmitter<'c> {
    config: &'c OutputConfig,
}

impl<'c> BuildFileEmitter<'c> {
    pub fn new(config: &'c OutputConfig) -> Self {
        Self { config }
    }

    pub fn emit(&self, registry: &Registry) -> Vec<Artifact> {
        let mut artifacts: Vec<Artifact> = registry
            .interfaces_for(Representation::Host)
            .map(|interface| {
                Artifact::new(
                    Representation::Host,
                    PathBuf::from(&interface.name).join("CMakeLists.txt"),
                    self.interface_cmake(interface),
                )
            })
            .collect();

        artifacts.push(Artifact::new(
            Representation::Host,
            "CMakeLists.txt",
            self.top_level_cmake(registry),
        ));
        artifacts.push(Artifact::new(
            Representation::Host,
            "Parser/CMakeLists.txt",
            self.parser_cmake(registry),
        ));
        artifacts.push(Artifact::new(
            Representation::Embedded,
            "messages.cmake",
            self.embedded_cmake(registry),
        ));
        artifacts
    }

    /// One library per host interface.
    pub fn interface_cmake(&self, interface: &Interface) -> String {
        let mut out = preamble(self.config, "CMakeLists.txt", CommentStyle::Hash);
        out.push_str("set(SOURCES\n");
        for name in &interface.messages {
            out.push_str(&format!("\t\"src/{name}.cpp\"\n"));
        }
        out.push_str(")\n\n");

        let library = &interface.name;
        out.push_str(&format!("add_library({library} ${{SOURCES}})\n"));
        out.push_str(&format!(
            "target_include_directories({library} PUBLIC ${{CMAKE_CURRENT_SOURCE_DIR}} ${{CMAKE_CURRENT_SOURCE_DIR}}/..)\n"
        ));
        out.push_str(&format!("target_link_libraries({library} MsgBase)\n"));
        out
    }

    pub fn top_level_cmake(&self, registry: &Registry) -> String {
        let mut out = preamble(self.config, "CMakeLists.txt", CommentStyle::Hash);
        for interface in registry.interfaces_for(Representation::Host) {
            out.push_str(&format!("add_subdirectory({})\n", interface.name));
        }
        out.push_str("add_subdirectory(Parser)\n");
        out
    }

    pub fn parser_cmake(&self, registry: &Registry) -> String {
        let mut out = preamble(self.config, "CMakeLists.txt", CommentStyle::Hash);
        out.push_str("add_library(Parser src/Parser.cpp)\n");
        out.push_str(
            "target_include_directories(Parser PUBLIC ${CMAKE_CURRENT_SOURCE_DIR} ${CMAKE_CURRENT_SOURCE_DIR}/..)\n",
        );
        out.push_str("target_link_libraries(Parser\n");
        for interface in registry.interfaces_for(Representation::Host) {
            out.push_str(&format!("\t{}\n", interface.name));
        }
        out.push_str(")\n");
        out
    }

    /// Sources grouped per interface plus the aggregated lists an embedded
    /// build includes.
    pub fn embedded_cmake(&self, registry: &Registry) -> String {
        let mut out = preamble(self.config, "messages.cmake", CommentStyle::Hash);
        let mut groups = Vec::new();

        for interface in registry.interfaces_for(Representation::Embedded) {
            let var = format!("MSG_{}_SOURCES", cmake_var(&interface.name));
            out.push_str(&format!("set({var}\n"));
            for name in &interface.messages {
                out.push_str(&format!("\t${{CMAKE_CURRENT_LIST_DIR}}/src/{name}.c\n"));
            }
            out.push_str(")\n\n");
            groups.push(var);
        }

        out.push_str("set(MSG_SOURCES\n");
        for var in &groups {
            out.push_str(&format!("\t${{{var}}}\n"));
        }
        out.push_str("\t${CMAKE_CURRENT_LIST_DIR}/src/Msg_Parser.c\n)\n\n");
        out.push_str("set(MSG_INCLUDE_DIRS ${CMAKE_CURRENT_LIST_DIR}/inc)\n");
        out
    }
}
