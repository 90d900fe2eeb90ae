use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the displacement vertex shader that bends the icosphere.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("wirescroll vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(vertex_source()),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the palette fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("wirescroll fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(fragment_source()),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

fn vertex_source() -> String {
    format!("{HEADER}\n{NOISE}\n{VERTEX_BODY}")
}

fn fragment_source() -> String {
    format!("{HEADER}\n{FRAGMENT_BODY}")
}

/// Uniform block shared by both stages.
///
/// The layout must match [`SceneUniforms`](crate::gpu::uniforms::SceneUniforms).
/// Members carry a leading underscore so the macro aliases below do not
/// rewrite them.
const HEADER: &str = r"#version 450

layout(std140, set = 0, binding = 0) uniform SceneParams {
    mat4 _projection;
    mat4 _view;
    mat4 _model;
    float _uFrequency;
    float _uAmplitude;
    float _uDensity;
    float _uStrength;
    float _uDeepPurple;
    float _uOpacity;
    vec2 _padding;
} scene;

#define uFrequency scene._uFrequency
#define uAmplitude scene._uAmplitude
#define uDensity scene._uDensity
#define uStrength scene._uStrength
#define uDeepPurple scene._uDeepPurple
#define uOpacity scene._uOpacity
";

/// Classic 3D Perlin noise (Stefan Gustavson, MIT licensed).
const NOISE: &str = r"vec4 permute(vec4 x) {
    return mod(((x * 34.0) + 1.0) * x, vec4(289.0));
}

vec4 taylor_inv_sqrt(vec4 r) {
    return 1.79284291400159 - 0.85373472095314 * r;
}

vec3 fade(vec3 t) {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

float cnoise(vec3 p) {
    vec3 pi0 = floor(p);
    vec3 pi1 = pi0 + vec3(1.0);
    pi0 = mod(pi0, vec3(289.0));
    pi1 = mod(pi1, vec3(289.0));
    vec3 pf0 = fract(p);
    vec3 pf1 = pf0 - vec3(1.0);
    vec4 ix = vec4(pi0.x, pi1.x, pi0.x, pi1.x);
    vec4 iy = vec4(pi0.y, pi0.y, pi1.y, pi1.y);
    vec4 iz0 = vec4(pi0.z);
    vec4 iz1 = vec4(pi1.z);

    vec4 ixy = permute(permute(ix) + iy);
    vec4 ixy0 = permute(ixy + iz0);
    vec4 ixy1 = permute(ixy + iz1);

    vec4 gx0 = ixy0 / 7.0;
    vec4 gy0 = fract(floor(gx0) / 7.0) - 0.5;
    gx0 = fract(gx0);
    vec4 gz0 = vec4(0.5) - abs(gx0) - abs(gy0);
    vec4 sz0 = step(gz0, vec4(0.0));
    gx0 -= sz0 * (step(vec4(0.0), gx0) - 0.5);
    gy0 -= sz0 * (step(vec4(0.0), gy0) - 0.5);

    vec4 gx1 = ixy1 / 7.0;
    vec4 gy1 = fract(floor(gx1) / 7.0) - 0.5;
    gx1 = fract(gx1);
    vec4 gz1 = vec4(0.5) - abs(gx1) - abs(gy1);
    vec4 sz1 = step(gz1, vec4(0.0));
    gx1 -= sz1 * (step(vec4(0.0), gx1) - 0.5);
    gy1 -= sz1 * (step(vec4(0.0), gy1) - 0.5);

    vec3 g000 = vec3(gx0.x, gy0.x, gz0.x);
    vec3 g100 = vec3(gx0.y, gy0.y, gz0.y);
    vec3 g010 = vec3(gx0.z, gy0.z, gz0.z);
    vec3 g110 = vec3(gx0.w, gy0.w, gz0.w);
    vec3 g001 = vec3(gx1.x, gy1.x, gz1.x);
    vec3 g101 = vec3(gx1.y, gy1.y, gz1.y);
    vec3 g011 = vec3(gx1.z, gy1.z, gz1.z);
    vec3 g111 = vec3(gx1.w, gy1.w, gz1.w);

    vec4 norm0 = taylor_inv_sqrt(vec4(dot(g000, g000), dot(g010, g010), dot(g100, g100), dot(g110, g110)));
    g000 *= norm0.x;
    g010 *= norm0.y;
    g100 *= norm0.z;
    g110 *= norm0.w;
    vec4 norm1 = taylor_inv_sqrt(vec4(dot(g001, g001), dot(g011, g011), dot(g101, g101), dot(g111, g111)));
    g001 *= norm1.x;
    g011 *= norm1.y;
    g101 *= norm1.z;
    g111 *= norm1.w;

    float n000 = dot(g000, pf0);
    float n100 = dot(g100, vec3(pf1.x, pf0.y, pf0.z));
    float n010 = dot(g010, vec3(pf0.x, pf1.y, pf0.z));
    float n110 = dot(g110, vec3(pf1.x, pf1.y, pf0.z));
    float n001 = dot(g001, vec3(pf0.x, pf0.y, pf1.z));
    float n101 = dot(g101, vec3(pf1.x, pf0.y, pf1.z));
    float n011 = dot(g011, vec3(pf0.x, pf1.y, pf1.z));
    float n111 = dot(g111, pf1);

    vec3 fade_xyz = fade(pf0);
    vec4 n_z = mix(vec4(n000, n100, n010, n110), vec4(n001, n101, n011, n111), fade_xyz.z);
    vec2 n_yz = mix(n_z.xy, n_z.zw, fade_xyz.y);
    float n_xyz = mix(n_yz.x, n_yz.y, fade_xyz.x);
    return 2.2 * n_xyz;
}
";

const VERTEX_BODY: &str = r"layout(location = 0) in vec3 position;
layout(location = 0) out float v_distort;

mat3 rotation_y(float angle) {
    float s = sin(angle);
    float c = cos(angle);
    return mat3(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c);
}

void main() {
    vec3 normal = normalize(position);
    float distortion = cnoise(normal * uDensity) * uStrength;
    vec3 displaced = position + normal * distortion;

    // Twist around Y, varying with latitude.
    float latitude = asin(clamp(normal.y, -1.0, 1.0)) / 3.14159265 + 0.5;
    float angle = sin(latitude * uFrequency) * uAmplitude;
    displaced = rotation_y(angle) * displaced;

    v_distort = distortion;
    gl_Position = scene._projection * scene._view * scene._model * vec4(displaced, 1.0);
}
";

const FRAGMENT_BODY: &str = r"layout(location = 0) in float v_distort;
layout(location = 0) out vec4 out_color;

vec3 cosine_palette(float t, vec3 a, vec3 b, vec3 c, vec3 d) {
    return a + b * cos(6.28318 * (c * t + d));
}

void main() {
    float distort = v_distort * 2.0;
    vec3 brightness = vec3(0.5, 0.5, 0.5);
    vec3 contrast = vec3(0.5, 0.5, 0.5);
    vec3 oscillation = vec3(1.0, 1.0, 1.0);
    vec3 phase = vec3(0.0, 0.1, 0.2);
    vec3 color = cosine_palette(distort, brightness, contrast, oscillation, phase);

    vec3 purple = cosine_palette(distort, vec3(0.3, 0.1, 0.5), vec3(0.3, 0.1, 0.4), oscillation, vec3(0.1, 0.25, 0.35));
    color = mix(color, purple, clamp(uDeepPurple, 0.0, 1.0));

    out_color = vec4(color, uOpacity);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use scrollfx::Parameter;

    #[test]
    fn header_aliases_every_parameter() {
        for parameter in Parameter::ALL {
            let name = parameter.uniform_name();
            assert!(
                HEADER.contains(&format!("float _{name};")),
                "missing block member for {name}"
            );
            assert!(
                HEADER.contains(&format!("#define {name} scene._{name}")),
                "missing alias for {name}"
            );
        }
    }

    #[test]
    fn both_stages_share_one_uniform_block() {
        assert!(vertex_source().starts_with(HEADER));
        assert!(fragment_source().starts_with(HEADER));
        assert_eq!(vertex_source().matches("#version").count(), 1);
        assert_eq!(fragment_source().matches("#version").count(), 1);
    }

    fn parse_and_validate(stage: ShaderStage, source: &str) {
        use wgpu::naga::front::glsl::{Frontend, Options};
        use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

        let module = Frontend::default()
            .parse(&Options::from(stage), source)
            .unwrap_or_else(|err| panic!("{stage:?} shader failed to parse: {err:?}"));
        Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .unwrap_or_else(|err| panic!("{stage:?} shader failed validation: {err:?}"));
    }

    #[test]
    fn vertex_shader_compiles() {
        parse_and_validate(ShaderStage::Vertex, &vertex_source());
    }

    #[test]
    fn fragment_shader_compiles() {
        parse_and_validate(ShaderStage::Fragment, &fragment_source());
    }

    #[test]
    fn vertex_output_feeds_fragment_input() {
        assert!(VERTEX_BODY.contains("layout(location = 0) out float v_distort;"));
        assert!(FRAGMENT_BODY.contains("layout(location = 0) in float v_distort;"));
    }
}
