//! Embedded GLSL sources for the cloud program.
//!
//! Both stages target Vulkan-flavoured GLSL 450 so naga can parse them. The
//! fragment stage is mirrored on the CPU by [`crate::noise`].

/// Name of the uniform the render loop writes every frame.
pub const CLOUD_SHIFT_UNIFORM: &str = "cloud_shift";

/// Passes clip-space positions through and forwards texture coordinates.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 in_position;
layout(location = 1) in vec2 in_tex_coord;
layout(location = 0) out vec2 tex_coord;

void main() {
    gl_Position = vec4(in_position, 0.0, 1.0);
    tex_coord = in_tex_coord;
}
";

/// Three octaves of value noise thresholded into cloud cover over a blue sky.
pub const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 tex_coord;
layout(location = 0) out vec4 frag_color;

layout(std140, set = 0, binding = 0) uniform CloudParams {
    float cloud_shift;
} params;

float smooth_noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = smoothstep(vec2(0.0), vec2(1.0), fract(st));
    float a = dot(i, vec2(1.0, 57.0)) + 1.0;
    float b = dot(i + vec2(1.0, 0.0), vec2(1.0, 57.0)) + 1.0;
    float c = dot(i + vec2(0.0, 1.0), vec2(1.0, 57.0)) + 1.0;
    float d = dot(i + vec2(1.0, 1.0), vec2(1.0, 57.0)) + 1.0;
    return mix(mix(fract(sin(a) * 43758.5453), fract(sin(b) * 43758.5453), f.x),
               mix(fract(sin(c) * 43758.5453), fract(sin(d) * 43758.5453), f.x), f.y);
}

void main() {
    float shift = params.cloud_shift;
    vec2 st = tex_coord * 5.0;
    st.x += shift * 0.15;
    float n = smooth_noise(st);
    float n1 = smooth_noise(st * 2.0 - shift * 0.05) * 0.5;
    float n2 = smooth_noise(st * 4.0 - shift * 0.1) * 0.25;
    n += n1 + n2;
    float cloud = smoothstep(0.3, 1.0, n);
    vec3 sky_color = vec3(0.602, 0.808, 0.980);
    vec3 cloud_color = vec3(0.97);
    frag_color = vec4(mix(cloud_color, sky_color, cloud), 1.0);
}
";
