// mpeg1-audio
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `synthesis` module implements the polyphase synthesis filterbank of the MPEG audio
//! standard: a 32-point sub-band transform filling a rotating V buffer, convolved with the
//! 512-tap synthesis window D.

/// Synthesis window D[i], defined in Table B.3 of ISO/IEC 11172-3.
#[allow(clippy::unreadable_literal)]
#[rustfmt::skip]
const SYNTHESIS_D: [f32; 512] = [
     0.000000000, -0.000015259, -0.000015259, -0.000015259,
    -0.000015259, -0.000015259, -0.000015259, -0.000030518,
    -0.000030518, -0.000030518, -0.000030518, -0.000045776,
    -0.000045776, -0.000061035, -0.000061035, -0.000076294,
    -0.000076294, -0.000091553, -0.000106812, -0.000106812,
    -0.000122070, -0.000137329, -0.000152588, -0.000167847,
    -0.000198364, -0.000213623, -0.000244141, -0.000259399,
    -0.000289917, -0.000320435, -0.000366211, -0.000396729,
    -0.000442505, -0.000473022, -0.000534058, -0.000579834,
    -0.000625610, -0.000686646, -0.000747681, -0.000808716,
    -0.000885010, -0.000961304, -0.001037598, -0.001113892,
    -0.001205444, -0.001296997, -0.001388550, -0.001480103,
    -0.001586914, -0.001693726, -0.001785278, -0.001907349,
    -0.002014160, -0.002120972, -0.002243042, -0.002349854,
    -0.002456665, -0.002578735, -0.002685547, -0.002792358,
    -0.002899170, -0.002990723, -0.003082275, -0.003173828,
     0.003250122,  0.003326416,  0.003387451,  0.003433228,
     0.003463745,  0.003479004,  0.003479004,  0.003463745,
     0.003417969,  0.003372192,  0.003280640,  0.003173828,
     0.003051758,  0.002883911,  0.002700806,  0.002487183,
     0.002227783,  0.001937866,  0.001617432,  0.001266479,
     0.000869751,  0.000442505, -0.000030518, -0.000549316,
    -0.001098633, -0.001693726, -0.002334595, -0.003005981,
    -0.003723145, -0.004486084, -0.005294800, -0.006118774,
    -0.007003784, -0.007919312, -0.008865356, -0.009841919,
    -0.010848999, -0.011886597, -0.012939453, -0.014022827,
    -0.015121460, -0.016235352, -0.017349243, -0.018463135,
    -0.019577026, -0.020690918, -0.021789551, -0.022857666,
    -0.023910522, -0.024932861, -0.025909424, -0.026840210,
    -0.027725220, -0.028533936, -0.029281616, -0.029937744,
    -0.030532837, -0.031005859, -0.031387329, -0.031661987,
    -0.031814575, -0.031845093, -0.031738281, -0.031478882,
     0.031082153,  0.030517578,  0.029785156,  0.028884888,
     0.027801514,  0.026535034,  0.025085449,  0.023422241,
     0.021575928,  0.019531250,  0.017257690,  0.014801025,
     0.012115479,  0.009231567,  0.006134033,  0.002822876,
    -0.000686646, -0.004394531, -0.008316040, -0.012420654,
    -0.016708374, -0.021179199, -0.025817871, -0.030609131,
    -0.035552979, -0.040634155, -0.045837402, -0.051132202,
    -0.056533813, -0.061996460, -0.067520142, -0.073059082,
    -0.078628540, -0.084182739, -0.089706421, -0.095169067,
    -0.100540161, -0.105819702, -0.110946655, -0.115921021,
    -0.120697021, -0.125259399, -0.129562378, -0.133590698,
    -0.137298584, -0.140670776, -0.143676758, -0.146255493,
    -0.148422241, -0.150115967, -0.151306152, -0.151962280,
    -0.152069092, -0.151596069, -0.150497437, -0.148773193,
    -0.146362305, -0.143264771, -0.139450073, -0.134887695,
    -0.129577637, -0.123474121, -0.116577148, -0.108856201,
     0.100311279,  0.090927124,  0.080688477,  0.069595337,
     0.057617187,  0.044784546,  0.031082153,  0.016510010,
     0.001068115, -0.015228271, -0.032379150, -0.050354004,
    -0.069168091, -0.088775635, -0.109161377, -0.130310059,
    -0.152206421, -0.174789429, -0.198059082, -0.221984863,
    -0.246505737, -0.271591187, -0.297210693, -0.323318481,
    -0.349868774, -0.376800537, -0.404083252, -0.431655884,
    -0.459472656, -0.487472534, -0.515609741, -0.543823242,
    -0.572036743, -0.600219727, -0.628295898, -0.656219482,
    -0.683914185, -0.711318970, -0.738372803, -0.765029907,
    -0.791213989, -0.816864014, -0.841949463, -0.866363525,
    -0.890090942, -0.913055420, -0.935195923, -0.956481934,
    -0.976852417, -0.996246338, -1.014617920, -1.031936646,
    -1.048156738, -1.063217163, -1.077117920, -1.089782715,
    -1.101211548, -1.111373901, -1.120223999, -1.127746582,
    -1.133926392, -1.138763428, -1.142211914, -1.144287109,
     1.144989014,  1.144287109,  1.142211914,  1.138763428,
     1.133926392,  1.127746582,  1.120223999,  1.111373901,
     1.101211548,  1.089782715,  1.077117920,  1.063217163,
     1.048156738,  1.031936646,  1.014617920,  0.996246338,
     0.976852417,  0.956481934,  0.935195923,  0.913055420,
     0.890090942,  0.866363525,  0.841949463,  0.816864014,
     0.791213989,  0.765029907,  0.738372803,  0.711318970,
     0.683914185,  0.656219482,  0.628295898,  0.600219727,
     0.572036743,  0.543823242,  0.515609741,  0.487472534,
     0.459472656,  0.431655884,  0.404083252,  0.376800537,
     0.349868774,  0.323318481,  0.297210693,  0.271591187,
     0.246505737,  0.221984863,  0.198059082,  0.174789429,
     0.152206421,  0.130310059,  0.109161377,  0.088775635,
     0.069168091,  0.050354004,  0.032379150,  0.015228271,
    -0.001068115, -0.016510010, -0.031082153, -0.044784546,
    -0.057617187, -0.069595337, -0.080688477, -0.090927124,
     0.100311279,  0.108856201,  0.116577148,  0.123474121,
     0.129577637,  0.134887695,  0.139450073,  0.143264771,
     0.146362305,  0.148773193,  0.150497437,  0.151596069,
     0.152069092,  0.151962280,  0.151306152,  0.150115967,
     0.148422241,  0.146255493,  0.143676758,  0.140670776,
     0.137298584,  0.133590698,  0.129562378,  0.125259399,
     0.120697021,  0.115921021,  0.110946655,  0.105819702,
     0.100540161,  0.095169067,  0.089706421,  0.084182739,
     0.078628540,  0.073059082,  0.067520142,  0.061996460,
     0.056533813,  0.051132202,  0.045837402,  0.040634155,
     0.035552979,  0.030609131,  0.025817871,  0.021179199,
     0.016708374,  0.012420654,  0.008316040,  0.004394531,
     0.000686646, -0.002822876, -0.006134033, -0.009231567,
    -0.012115479, -0.014801025, -0.017257690, -0.019531250,
    -0.021575928, -0.023422241, -0.025085449, -0.026535034,
    -0.027801514, -0.028884888, -0.029785156, -0.030517578,
     0.031082153,  0.031478882,  0.031738281,  0.031845093,
     0.031814575,  0.031661987,  0.031387329,  0.031005859,
     0.030532837,  0.029937744,  0.029281616,  0.028533936,
     0.027725220,  0.026840210,  0.025909424,  0.024932861,
     0.023910522,  0.022857666,  0.021789551,  0.020690918,
     0.019577026,  0.018463135,  0.017349243,  0.016235352,
     0.015121460,  0.014022827,  0.012939453,  0.011886597,
     0.010848999,  0.009841919,  0.008865356,  0.007919312,
     0.007003784,  0.006118774,  0.005294800,  0.004486084,
     0.003723145,  0.003005981,  0.002334595,  0.001693726,
     0.001098633,  0.000549316,  0.000030518, -0.000442505,
    -0.000869751, -0.001266479, -0.001617432, -0.001937866,
    -0.002227783, -0.002487183, -0.002700806, -0.002883911,
    -0.003051758, -0.003173828, -0.003280640, -0.003372192,
    -0.003417969, -0.003463745, -0.003479004, -0.003479004,
    -0.003463745, -0.003433228, -0.003387451, -0.003326416,
     0.003250122,  0.003173828,  0.003082275,  0.002990723,
     0.002899170,  0.002792358,  0.002685547,  0.002578735,
     0.002456665,  0.002349854,  0.002243042,  0.002120972,
     0.002014160,  0.001907349,  0.001785278,  0.001693726,
     0.001586914,  0.001480103,  0.001388550,  0.001296997,
     0.001205444,  0.001113892,  0.001037598,  0.000961304,
     0.000885010,  0.000808716,  0.000747681,  0.000686646,
     0.000625610,  0.000579834,  0.000534058,  0.000473022,
     0.000442505,  0.000396729,  0.000366211,  0.000320435,
     0.000289917,  0.000259399,  0.000244141,  0.000213623,
     0.000198364,  0.000167847,  0.000152588,  0.000137329,
     0.000122070,  0.000106812,  0.000106812,  0.000091553,
     0.000076294,  0.000076294,  0.000061035,  0.000061035,
     0.000045776,  0.000045776,  0.000030518,  0.000030518,
     0.000030518,  0.000030518,  0.000015259,  0.000015259,
     0.000015259,  0.000015259,  0.000015259,  0.000015259,
];

/// The window as the sweep code consumes it: scaled up by 2^15 (the output stage divides the
/// accumulated samples by 32767 * 65536) and laid out twice back-to-back so a windowed sweep
/// never has to wrap its index mid-run.
pub fn build_window() -> [f32; 1024] {
    let mut d = [0.0f32; 1024];
    for (i, &w) in SYNTHESIS_D.iter().enumerate() {
        d[i] = w * 32768.0;
        d[i + 512] = w * 32768.0;
    }
    d
}

/// 32-point IDCT of one sub-block: reads the 32 sub-band samples `s[0..32][ss]` and writes the
/// 64-sample mirrored output into `v[v_pos..v_pos + 64]`.
///
/// `v_pos` is always a multiple of 64, so the write never crosses the end of the 1024-entry V
/// buffer. The dataflow is the usual radix-2 butterfly cascade with the twiddle factors inlined
/// as literals; the operation order is load-bearing, reordering changes the float rounding.
#[allow(clippy::excessive_precision)]
pub fn idct32(s: &[[i32; 3]; 32], ss: usize, v: &mut [f32], v_pos: usize) {
    let mut t01 = (s[0][ss] + s[31][ss]) as f32;
    let mut t02 = (s[0][ss] - s[31][ss]) as f32 * 0.500602998235;
    let mut t03 = (s[1][ss] + s[30][ss]) as f32;
    let mut t04 = (s[1][ss] - s[30][ss]) as f32 * 0.505470959898;
    let mut t05 = (s[2][ss] + s[29][ss]) as f32;
    let mut t06 = (s[2][ss] - s[29][ss]) as f32 * 0.515447309923;
    let mut t07 = (s[3][ss] + s[28][ss]) as f32;
    let mut t08 = (s[3][ss] - s[28][ss]) as f32 * 0.53104259109;
    let mut t09 = (s[4][ss] + s[27][ss]) as f32;
    let mut t10 = (s[4][ss] - s[27][ss]) as f32 * 0.553103896034;
    let mut t11 = (s[5][ss] + s[26][ss]) as f32;
    let mut t12 = (s[5][ss] - s[26][ss]) as f32 * 0.582934968206;
    let mut t13 = (s[6][ss] + s[25][ss]) as f32;
    let mut t14 = (s[6][ss] - s[25][ss]) as f32 * 0.622504123036;
    let mut t15 = (s[7][ss] + s[24][ss]) as f32;
    let mut t16 = (s[7][ss] - s[24][ss]) as f32 * 0.674808341455;
    let mut t17 = (s[8][ss] + s[23][ss]) as f32;
    let mut t18 = (s[8][ss] - s[23][ss]) as f32 * 0.744536271002;
    let mut t19 = (s[9][ss] + s[22][ss]) as f32;
    let mut t20 = (s[9][ss] - s[22][ss]) as f32 * 0.839349645416;
    let mut t21 = (s[10][ss] + s[21][ss]) as f32;
    let mut t22 = (s[10][ss] - s[21][ss]) as f32 * 0.972568237862;
    let mut t23 = (s[11][ss] + s[20][ss]) as f32;
    let mut t24 = (s[11][ss] - s[20][ss]) as f32 * 1.16943993343;
    let mut t25 = (s[12][ss] + s[19][ss]) as f32;
    let mut t26 = (s[12][ss] - s[19][ss]) as f32 * 1.48416461631;
    let mut t27 = (s[13][ss] + s[18][ss]) as f32;
    let mut t28 = (s[13][ss] - s[18][ss]) as f32 * 2.05778100995;
    let mut t29 = (s[14][ss] + s[17][ss]) as f32;
    let mut t30 = (s[14][ss] - s[17][ss]) as f32 * 3.40760841847;
    let mut t31 = (s[15][ss] + s[16][ss]) as f32;
    let mut t32 = (s[15][ss] - s[16][ss]) as f32 * 10.1900081235;
    let mut t33;

    t33 = t01 + t31;
    t31 = (t01 - t31) * 0.502419286188;
    t01 = t03 + t29;
    t29 = (t03 - t29) * 0.52249861494;
    t03 = t05 + t27;
    t27 = (t05 - t27) * 0.566944034816;
    t05 = t07 + t25;
    t25 = (t07 - t25) * 0.64682178336;
    t07 = t09 + t23;
    t23 = (t09 - t23) * 0.788154623451;
    t09 = t11 + t21;
    t21 = (t11 - t21) * 1.06067768599;
    t11 = t13 + t19;
    t19 = (t13 - t19) * 1.72244709824;
    t13 = t15 + t17;
    t17 = (t15 - t17) * 5.10114861869;
    t15 = t33 + t13;
    t13 = (t33 - t13) * 0.509795579104;
    t33 = t01 + t11;
    t01 = (t01 - t11) * 0.601344886935;
    t11 = t03 + t09;
    t09 = (t03 - t09) * 0.899976223136;
    t03 = t05 + t07;
    t07 = (t05 - t07) * 2.56291544774;
    t05 = t15 + t03;
    t15 = (t15 - t03) * 0.541196100146;
    t03 = t33 + t11;
    t11 = (t33 - t11) * 1.30656296488;
    t33 = t05 + t03;
    t05 = (t05 - t03) * 0.707106781187;
    t03 = t15 + t11;
    t15 = (t15 - t11) * 0.707106781187;
    t03 += t15;
    t11 = t13 + t07;
    t13 = (t13 - t07) * 0.541196100146;
    t07 = t01 + t09;
    t09 = (t01 - t09) * 1.30656296488;
    t01 = t11 + t07;
    t07 = (t11 - t07) * 0.707106781187;
    t11 = t13 + t09;
    t13 = (t13 - t09) * 0.707106781187;
    t11 += t13;
    t01 += t11;
    t11 += t07;
    t07 += t13;
    t09 = t31 + t17;
    t31 = (t31 - t17) * 0.509795579104;
    t17 = t29 + t19;
    t29 = (t29 - t19) * 0.601344886935;
    t19 = t27 + t21;
    t21 = (t27 - t21) * 0.899976223136;
    t27 = t25 + t23;
    t23 = (t25 - t23) * 2.56291544774;
    t25 = t09 + t27;
    t09 = (t09 - t27) * 0.541196100146;
    t27 = t17 + t19;
    t19 = (t17 - t19) * 1.30656296488;
    t17 = t25 + t27;
    t27 = (t25 - t27) * 0.707106781187;
    t25 = t09 + t19;
    t19 = (t09 - t19) * 0.707106781187;
    t25 += t19;
    t09 = t31 + t23;
    t31 = (t31 - t23) * 0.541196100146;
    t23 = t29 + t21;
    t21 = (t29 - t21) * 1.30656296488;
    t29 = t09 + t23;
    t23 = (t09 - t23) * 0.707106781187;
    t09 = t31 + t21;
    t31 = (t31 - t21) * 0.707106781187;
    t09 += t31;
    t29 += t09;
    t09 += t23;
    t23 += t31;
    t17 += t29;
    t29 += t25;
    t25 += t09;
    t09 += t27;
    t27 += t23;
    t23 += t19;
    t19 += t31;
    t21 = t02 + t32;
    t02 = (t02 - t32) * 0.502419286188;
    t32 = t04 + t30;
    t04 = (t04 - t30) * 0.52249861494;
    t30 = t06 + t28;
    t28 = (t06 - t28) * 0.566944034816;
    t06 = t08 + t26;
    t08 = (t08 - t26) * 0.64682178336;
    t26 = t10 + t24;
    t10 = (t10 - t24) * 0.788154623451;
    t24 = t12 + t22;
    t22 = (t12 - t22) * 1.06067768599;
    t12 = t14 + t20;
    t20 = (t14 - t20) * 1.72244709824;
    t14 = t16 + t18;
    t16 = (t16 - t18) * 5.10114861869;
    t18 = t21 + t14;
    t14 = (t21 - t14) * 0.509795579104;
    t21 = t32 + t12;
    t32 = (t32 - t12) * 0.601344886935;
    t12 = t30 + t24;
    t24 = (t30 - t24) * 0.899976223136;
    t30 = t06 + t26;
    t26 = (t06 - t26) * 2.56291544774;
    t06 = t18 + t30;
    t18 = (t18 - t30) * 0.541196100146;
    t30 = t21 + t12;
    t12 = (t21 - t12) * 1.30656296488;
    t21 = t06 + t30;
    t30 = (t06 - t30) * 0.707106781187;
    t06 = t18 + t12;
    t12 = (t18 - t12) * 0.707106781187;
    t06 += t12;
    t18 = t14 + t26;
    t26 = (t14 - t26) * 0.541196100146;
    t14 = t32 + t24;
    t24 = (t32 - t24) * 1.30656296488;
    t32 = t18 + t14;
    t14 = (t18 - t14) * 0.707106781187;
    t18 = t26 + t24;
    t24 = (t26 - t24) * 0.707106781187;
    t18 += t24;
    t32 += t18;
    t18 += t14;
    t26 = t14 + t24;
    t14 = t02 + t16;
    t02 = (t02 - t16) * 0.509795579104;
    t16 = t04 + t20;
    t04 = (t04 - t20) * 0.601344886935;
    t20 = t28 + t22;
    t22 = (t28 - t22) * 0.899976223136;
    t28 = t08 + t10;
    t10 = (t08 - t10) * 2.56291544774;
    t08 = t14 + t28;
    t14 = (t14 - t28) * 0.541196100146;
    t28 = t16 + t20;
    t20 = (t16 - t20) * 1.30656296488;
    t16 = t08 + t28;
    t28 = (t08 - t28) * 0.707106781187;
    t08 = t14 + t20;
    t20 = (t14 - t20) * 0.707106781187;
    t08 += t20;
    t14 = t02 + t10;
    t02 = (t02 - t10) * 0.541196100146;
    t10 = t04 + t22;
    t22 = (t04 - t22) * 1.30656296488;
    t04 = t14 + t10;
    t10 = (t14 - t10) * 0.707106781187;
    t14 = t02 + t22;
    t02 = (t02 - t22) * 0.707106781187;
    t14 += t02;
    t04 += t14;
    t14 += t10;
    t10 += t02;
    t16 += t04;
    t04 += t08;
    t08 += t14;
    t14 += t28;
    t28 += t10;
    t10 += t20;
    t20 += t02;
    t21 += t16;
    t16 += t32;
    t32 += t04;
    t04 += t06;
    t06 += t08;
    t08 += t18;
    t18 += t14;
    t14 += t30;
    t30 += t28;
    t28 += t26;
    t26 += t10;
    t10 += t12;
    t12 += t20;
    t20 += t24;
    t24 += t02;

    v[v_pos + 48] = -t33;
    v[v_pos + 49] = -t21;
    v[v_pos + 47] = -t21;
    v[v_pos + 50] = -t17;
    v[v_pos + 46] = -t17;
    v[v_pos + 51] = -t16;
    v[v_pos + 45] = -t16;
    v[v_pos + 52] = -t01;
    v[v_pos + 44] = -t01;
    v[v_pos + 53] = -t32;
    v[v_pos + 43] = -t32;
    v[v_pos + 54] = -t29;
    v[v_pos + 42] = -t29;
    v[v_pos + 55] = -t04;
    v[v_pos + 41] = -t04;
    v[v_pos + 56] = -t03;
    v[v_pos + 40] = -t03;
    v[v_pos + 57] = -t06;
    v[v_pos + 39] = -t06;
    v[v_pos + 58] = -t25;
    v[v_pos + 38] = -t25;
    v[v_pos + 59] = -t08;
    v[v_pos + 37] = -t08;
    v[v_pos + 60] = -t11;
    v[v_pos + 36] = -t11;
    v[v_pos + 61] = -t18;
    v[v_pos + 35] = -t18;
    v[v_pos + 62] = -t09;
    v[v_pos + 34] = -t09;
    v[v_pos + 63] = -t14;
    v[v_pos + 33] = -t14;
    v[v_pos + 32] = -t05;
    v[v_pos] = t05;
    v[v_pos + 31] = -t30;
    v[v_pos + 1] = t30;
    v[v_pos + 30] = -t27;
    v[v_pos + 2] = t27;
    v[v_pos + 29] = -t28;
    v[v_pos + 3] = t28;
    v[v_pos + 28] = -t07;
    v[v_pos + 4] = t07;
    v[v_pos + 27] = -t26;
    v[v_pos + 5] = t26;
    v[v_pos + 26] = -t23;
    v[v_pos + 6] = t23;
    v[v_pos + 25] = -t10;
    v[v_pos + 7] = t10;
    v[v_pos + 24] = -t15;
    v[v_pos + 8] = t15;
    v[v_pos + 23] = -t12;
    v[v_pos + 9] = t12;
    v[v_pos + 22] = -t19;
    v[v_pos + 10] = t19;
    v[v_pos + 21] = -t20;
    v[v_pos + 11] = t20;
    v[v_pos + 20] = -t13;
    v[v_pos + 12] = t13;
    v[v_pos + 19] = -t24;
    v[v_pos + 13] = t24;
    v[v_pos + 18] = -t31;
    v[v_pos + 14] = t31;
    v[v_pos + 17] = -t02;
    v[v_pos + 15] = t02;
    v[v_pos + 16] = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_duplicates_and_scales() {
        let d = build_window();
        for i in 0..512 {
            assert_eq!(d[i], d[i + 512]);
            assert_eq!(d[i], SYNTHESIS_D[i] * 32768.0);
        }
    }

    #[test]
    fn idct_of_silence_is_silence() {
        let s = [[0i32; 3]; 32];
        let mut v = [1.0f32; 1024];
        idct32(&s, 0, &mut v, 64);
        assert!(v[64..128].iter().all(|&x| x == 0.0));
        // Entries outside the 64-sample window are untouched.
        assert!(v[..64].iter().all(|&x| x == 1.0));
        assert!(v[128..].iter().all(|&x| x == 1.0));
    }

    #[test]
    fn idct_output_is_mirrored_around_block_center() {
        let mut s = [[0i32; 3]; 32];
        s[0][0] = 1000;
        s[5][0] = -700;
        let mut v = [0.0f32; 1024];
        idct32(&s, 0, &mut v, 0);
        assert_eq!(v[16], 0.0);
        for i in 1..16 {
            assert_eq!(v[16 - i], -v[16 + i]);
        }
        for i in 1..15 {
            assert_eq!(v[48 - i], v[48 + i]);
        }
    }
}
