// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Names of the shaders every backend ships with.

/// The skybox shader.
pub const BUILTIN_SKYBOX: &str = "Shader.Builtin.Skybox";
/// The default material shader used by world views.
pub const BUILTIN_MATERIAL: &str = "Shader.Builtin.Material";
/// The UI shader.
pub const BUILTIN_UI: &str = "Shader.Builtin.UI";

/// All built-in shader names.
pub const BUILTIN_SHADERS: [&str; 3] = [BUILTIN_SKYBOX, BUILTIN_MATERIAL, BUILTIN_UI];
